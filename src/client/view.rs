use uuid::Uuid;

use crate::claims::{ClaimStyle, render_raw};

use super::ClaimMatrix;

/// Drawing target notified of every change a reconciliation makes.
pub trait TileSurface: Send {
    /// Draw tile `(x, y)` with `style`.
    fn repaint(&mut self, x: u32, y: u32, style: &ClaimStyle);
    /// Hide or show the whole board.
    fn set_hidden(&mut self, hidden: bool);
}

/// Tile whose claim changed during a reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct Repaint {
    /// Column of the tile.
    pub x: u32,
    /// Row of the tile.
    pub y: u32,
    /// Claim string now shown, as received from the server.
    pub claim: String,
    /// Style the tile is now drawn with.
    pub style: ClaimStyle,
}

/// Result of folding a claim matrix into a [`BoardView`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// The matrix was applied; `revealed` is set when the view was hidden before.
    Updated {
        /// Tiles whose claim changed.
        repaints: Vec<Repaint>,
        /// Whether the board was hidden before this matrix.
        revealed: bool,
    },
    /// The board cannot be shown; the view is now hidden and unchanged otherwise.
    Hidden {
        /// Why the board was hidden.
        reason: String,
    },
}

impl Reconciliation {
    /// Tiles to redraw; empty when the board was hidden.
    pub fn repaints(&self) -> &[Repaint] {
        match self {
            Reconciliation::Updated { repaints, .. } => repaints,
            Reconciliation::Hidden { .. } => &[],
        }
    }

    /// Forward this reconciliation to `surface`.
    pub fn paint(&self, surface: &mut dyn TileSurface) {
        match self {
            Reconciliation::Updated { repaints, revealed } => {
                if *revealed {
                    surface.set_hidden(false);
                }
                for repaint in repaints {
                    surface.repaint(repaint.x, repaint.y, &repaint.style);
                }
            }
            Reconciliation::Hidden { .. } => surface.set_hidden(true),
        }
    }
}

/// Claims currently shown by one viewer of one board.
#[derive(Debug, Clone)]
pub struct BoardView {
    board_id: Uuid,
    width: u32,
    height: u32,
    /// Rendered claim strings, `[y][x]`.
    rendered: Vec<Vec<String>>,
    hidden: bool,
}

impl BoardView {
    /// View of a freshly drawn board where every tile is shown unclaimed.
    pub fn new(board_id: Uuid, width: u32, height: u32) -> Self {
        Self {
            board_id,
            width,
            height,
            rendered: vec![vec![String::new(); width as usize]; height as usize],
            hidden: false,
        }
    }

    /// Board shown by this view.
    pub fn board_id(&self) -> Uuid {
        self.board_id
    }

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the board is currently hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Claim string currently shown at `(x, y)`.
    pub fn rendered(&self, x: u32, y: u32) -> Option<&str> {
        self.rendered
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .map(String::as_str)
    }

    /// Bring the view in line with `matrix`, re-rendering only tiles whose claim differs.
    pub fn reconcile(&mut self, matrix: &ClaimMatrix) -> Reconciliation {
        if let Err(reason) = self.check_shape(matrix) {
            return self.hide(reason);
        }

        let revealed = std::mem::replace(&mut self.hidden, false);
        let mut repaints = Vec::new();

        for (y, (shown_row, incoming_row)) in self.rendered.iter_mut().zip(&matrix.claims).enumerate() {
            for (x, (shown, incoming)) in shown_row.iter_mut().zip(incoming_row).enumerate() {
                if shown == incoming {
                    continue;
                }
                shown.clone_from(incoming);
                repaints.push(Repaint {
                    x: x as u32,
                    y: y as u32,
                    claim: incoming.clone(),
                    style: render_raw(incoming),
                });
            }
        }

        Reconciliation::Updated { repaints, revealed }
    }

    /// Hide the board, keeping the rendered claims for when it comes back.
    pub fn hide(&mut self, reason: String) -> Reconciliation {
        self.hidden = true;
        Reconciliation::Hidden { reason }
    }

    fn check_shape(&self, matrix: &ClaimMatrix) -> Result<(), String> {
        if matrix.width != self.width || matrix.height != self.height {
            return Err(format!(
                "matrix is {}x{} but the board is {}x{}",
                matrix.width, matrix.height, self.width, self.height
            ));
        }
        if matrix.claims.len() != self.height as usize {
            return Err(format!(
                "matrix has {} rows, expected {}",
                matrix.claims.len(),
                self.height
            ));
        }
        if let Some(y) = matrix
            .claims
            .iter()
            .position(|row| row.len() != self.width as usize)
        {
            return Err(format!(
                "row {y} has {} cells, expected {}",
                matrix.claims[y].len(),
                self.width
            ));
        }
        Ok(())
    }
}
