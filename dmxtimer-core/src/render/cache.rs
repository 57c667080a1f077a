//! Render cache
//!
//! Tracks stale regions and the last drawn contents of every row.
//! Every paint path clears exactly the area it owns before drawing, since
//! the surface has no double buffer.

use crate::menu::{Field, Row};
use crate::traits::{DisplaySurface, Rect, Shade};

use super::layout;
use super::{Invalidation, RowView, View};

/// Remembers what is on screen and repaints only what went stale
#[derive(Debug, Clone, Default)]
pub struct RenderCache {
    full: bool,
    rows: [bool; Row::COUNT],
    fields: [[bool; 2]; Row::COUNT],
    /// Contents at the last successful flush; `None` until the first one
    drawn: Option<[RowView; Row::COUNT]>,
}

impl RenderCache {
    /// Create a cache with nothing drawn yet (the first flush is full)
    pub fn new() -> Self {
        Self {
            full: true,
            ..Default::default()
        }
    }

    /// Mark a whole row band stale
    pub fn invalidate_row(&mut self, row: Row) {
        self.rows[row.index()] = true;
    }

    /// Mark one value box stale
    pub fn invalidate_field(&mut self, row: Row, field: Field) {
        self.fields[row.index()][field.slot()] = true;
    }

    /// Repaint everything, including static chrome, on the next flush
    pub fn force_full_redraw(&mut self) {
        self.full = true;
    }

    pub fn apply(&mut self, invalidation: Invalidation) {
        match invalidation {
            Invalidation::Full => self.force_full_redraw(),
            Invalidation::Row(row) => self.invalidate_row(row),
            Invalidation::Field(row, field) => self.invalidate_field(row, field),
        }
    }

    /// Whether the next flush has anything to paint
    pub fn is_dirty(&self) -> bool {
        self.full
            || self.rows.iter().any(|r| *r)
            || self.fields.iter().flatten().any(|f| *f)
    }

    /// Compare `view` against what was last drawn and mark differences
    ///
    /// Catches changes that no input event reported, such as the status
    /// countdown or the start/stop label following the engine phase.
    pub fn detect_changes(&mut self, view: &View) {
        let Some(drawn) = &self.drawn else {
            self.full = true;
            return;
        };

        for row in Row::ALL {
            let i = row.index();
            let now = view.row(row);
            let before = &drawn[i];

            if now.label != before.label || now.highlighted != before.highlighted {
                self.rows[i] = true;
                continue;
            }

            for field in row.fields() {
                let slot = field.slot();
                let focus_moved =
                    (now.focus == Some(*field)) != (before.focus == Some(*field));
                if focus_moved || now.values[slot] != before.values[slot] {
                    self.fields[i][slot] = true;
                }
            }
        }
    }

    /// Repaint stale regions and push them to the panel
    ///
    /// Returns `Ok(false)` without touching the surface when nothing is
    /// stale. On error the next flush repaints the whole screen.
    pub fn flush<S: DisplaySurface>(
        &mut self,
        surface: &mut S,
        view: &View,
    ) -> Result<bool, S::Error> {
        self.detect_changes(view);
        if !self.is_dirty() {
            return Ok(false);
        }

        let rows: [RowView; Row::COUNT] = core::array::from_fn(|i| view.row(Row::ALL[i]));

        match self.paint(surface, &rows).and_then(|()| surface.flush()) {
            Ok(()) => {
                self.full = false;
                self.rows = [false; Row::COUNT];
                self.fields = [[false; 2]; Row::COUNT];
                self.drawn = Some(rows);
                Ok(true)
            }
            Err(e) => {
                self.full = true;
                Err(e)
            }
        }
    }

    fn paint<S: DisplaySurface>(
        &self,
        surface: &mut S,
        rows: &[RowView; Row::COUNT],
    ) -> Result<(), S::Error> {
        if self.full {
            surface.clear()?;
            paint_chrome(surface)?;
            for row in Row::ALL {
                paint_row(surface, row, &rows[row.index()])?;
            }
            return Ok(());
        }

        for row in Row::ALL {
            let i = row.index();
            if self.rows[i] {
                paint_row(surface, row, &rows[i])?;
                continue;
            }
            for field in row.fields() {
                if self.fields[i][field.slot()] {
                    paint_field(surface, row, *field, &rows[i])?;
                }
            }
        }
        Ok(())
    }
}

fn background(view: &RowView) -> Shade {
    if view.highlighted {
        Shade::Foreground
    } else {
        Shade::Background
    }
}

/// Title, rule and lamp icon
fn paint_chrome<S: DisplaySurface>(surface: &mut S) -> Result<(), S::Error> {
    surface.draw_text(
        layout::TITLE_X,
        layout::TITLE_Y,
        layout::TITLE,
        Shade::Foreground,
    )?;
    surface.fill_rect(
        Rect::new(0, layout::RULE_Y, layout::WIDTH, 1),
        Shade::Foreground,
    )?;
    surface.draw_bitmap(
        layout::LAMP_X,
        layout::LAMP_Y,
        layout::LAMP_WIDTH,
        &layout::LAMP,
        Shade::Foreground,
    )
}

fn paint_row<S: DisplaySurface>(surface: &mut S, row: Row, view: &RowView) -> Result<(), S::Error> {
    let bg = background(view);
    let y = layout::row_y(row);

    surface.fill_rect(layout::row_rect(row), bg)?;
    surface.draw_text(layout::LABEL_X, y, view.label, bg.inverse())?;
    if row.is_multi_field() {
        surface.draw_text(layout::COLON_X, y, ":", bg.inverse())?;
    }
    for field in row.fields() {
        paint_field(surface, row, *field, view)?;
    }
    Ok(())
}

fn paint_field<S: DisplaySurface>(
    surface: &mut S,
    row: Row,
    field: Field,
    view: &RowView,
) -> Result<(), S::Error> {
    let bg = background(view);
    let area = layout::field_rect(row, field);

    surface.fill_rect(area, bg)?;
    surface.draw_text(
        layout::field_x(row, field),
        layout::row_y(row),
        &view.values[field.slot()],
        bg.inverse(),
    )?;
    if view.focus == Some(field) {
        surface.outline_rect(area, bg.inverse())?;
    }
    Ok(())
}
