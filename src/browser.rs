//! Reveal the raw trip table five rows at a time.

use std::env;
use std::io::{BufRead, Write};
use std::ops::Range;
use std::sync::Once;

use crate::error::Result;
use crate::model::TripTable;
use crate::prompt::Console;

pub const CHUNK_SIZE: usize = 5;

/// Polars hides middle columns past eight; every trip column matters here.
/// Settings already present in the environment are left alone.
fn show_all_columns() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        for (key, value) in [("POLARS_FMT_MAX_COLS", "-1"), ("POLARS_TABLE_WIDTH", "1000")] {
            if env::var_os(key).is_none() {
                env::set_var(key, value);
            }
        }
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkLabel {
    First,
    Next,
}

impl ChunkLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ChunkLabel::First => "first",
            ChunkLabel::Next => "next",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// Waiting for a yes/no on showing the next chunk.
    AwaitingContinue,
    /// Waiting for a yes/no on starting over from row 0. `show_first` is set
    /// when the user declined a chunk: a yes then shows rows `[0, 5)` at once.
    AwaitingRestart { show_first: bool },
    Exit,
}

/// The question the pager wants answered next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    ShowChunk(ChunkLabel),
    Restart,
}

#[derive(Debug, Clone)]
pub struct Pager {
    total: usize,
    cursor: usize,
    label: ChunkLabel,
    state: PagerState,
}

impl Pager {
    pub fn new(total: usize) -> Self {
        let state = if total == 0 {
            PagerState::Exit
        } else {
            PagerState::AwaitingContinue
        };
        Self {
            total,
            cursor: 0,
            label: ChunkLabel::First,
            state,
        }
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn prompt(&self) -> Option<Prompt> {
        match self.state {
            PagerState::AwaitingContinue => Some(Prompt::ShowChunk(self.label)),
            PagerState::AwaitingRestart { .. } => Some(Prompt::Restart),
            PagerState::Exit => None,
        }
    }

    /// Feed the answer to the current prompt. Returns the rows to display,
    /// if the transition shows a chunk.
    pub fn answer(&mut self, yes: bool) -> Option<Range<usize>> {
        match (self.state, yes) {
            (PagerState::AwaitingContinue, true) => Some(self.advance()),
            (PagerState::AwaitingContinue, false) => {
                self.state = PagerState::AwaitingRestart { show_first: true };
                None
            }
            (PagerState::AwaitingRestart { show_first }, true) => {
                self.cursor = 0;
                self.label = ChunkLabel::First;
                if show_first {
                    Some(self.advance())
                } else {
                    self.state = PagerState::AwaitingContinue;
                    None
                }
            }
            (PagerState::AwaitingRestart { .. }, false) | (PagerState::Exit, _) => {
                self.state = PagerState::Exit;
                None
            }
        }
    }

    fn advance(&mut self) -> Range<usize> {
        let start = self.cursor;
        let end = (start + CHUNK_SIZE).min(self.total);
        self.cursor = start + CHUNK_SIZE;
        self.label = ChunkLabel::Next;
        self.state = if self.cursor >= self.total {
            PagerState::AwaitingRestart { show_first: false }
        } else {
            PagerState::AwaitingContinue
        };
        start..end
    }
}

/// Let the user page through `table`. Returns immediately for an empty table.
pub fn browse<R: BufRead, W: Write>(console: &mut Console<R, W>, table: &TripTable) -> Result<()> {
    let mut pager = Pager::new(table.height());
    show_all_columns();

    while let Some(prompt) = pager.prompt() {
        let question = match prompt {
            Prompt::ShowChunk(label) => format!(
                "Do you want to check the {} {} rows of the dataset of {}? (yes/no)",
                label.as_str(),
                CHUNK_SIZE,
                table.city()
            ),
            Prompt::Restart => format!(
                "Do you want to restart with the first {CHUNK_SIZE} rows? (yes/any other input to exit)"
            ),
        };
        let yes = console.confirm(&question)?;
        if let Some(rows) = pager.answer(yes) {
            tracing::debug!(start = rows.start, end = rows.end, "showing rows");
            let chunk = table.rows(rows.start, rows.len());
            writeln!(console.output(), "{chunk}")?;
        }
    }
    Ok(())
}
