//! Print composer: fit the whole board onto one page.
//!
//! Printing installs a fit-to-page transform on the visual tree, which
//! stands in for the pan on both layers until the job finishes. The host
//! shows its print preview for a fixed delay (so images finish painting),
//! prints, then the pan comes back on the next full render.
//!
//! Synchronous hosts call [`print_with`]. Hosts that must wait on a timer
//! call [`BoardEngine::begin_print`], arm the timer for
//! [`PrintJob::delay_ms`], and call [`BoardEngine::finish_print`] after
//! printing.

use crate::sync::BoardEngine;
use picto_core::PrintLayout;
use picto_render::{Damage, RenderScope};

/// Hooks into the host's print machinery.
pub trait PrintHost {
    /// Enter or leave print preview (e.g. an `is-printing` body class).
    fn set_preview(&mut self, on: bool);

    fn pause(&mut self, ms: u32);

    fn print(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrintJob {
    /// Print right away with the current transforms.
    Immediate,
    /// The print transform is installed until `finish_print`.
    Composed { layout: PrintLayout, delay_ms: u32 },
}

impl PrintJob {
    pub fn delay_ms(&self) -> u32 {
        match self {
            Self::Immediate => 0,
            Self::Composed { delay_ms, .. } => *delay_ms,
        }
    }

    pub fn layout(&self) -> Option<&PrintLayout> {
        match self {
            Self::Immediate => None,
            Self::Composed { layout, .. } => Some(layout),
        }
    }
}

impl BoardEngine {
    /// Prepare the tree for printing. Input is ignored until
    /// [`finish_print`](Self::finish_print).
    pub fn begin_print(&mut self) -> PrintJob {
        self.printing = true;
        let Some(bounds) = self.scene().bounds() else {
            log::info!("print: empty board");
            return PrintJob::Immediate;
        };

        self.deselect();
        self.render(RenderScope::Full);

        let Some(layout) = PrintLayout::fit(bounds, &self.config().page) else {
            log::warn!("print: degenerate content bounds {bounds:?}, printing untransformed");
            return PrintJob::Immediate;
        };

        self.tree_mut().set_print_layout(Some(layout));
        self.render(RenderScope::Layers);
        log::info!(
            "print: scale {:.3}, offset ({:.1}, {:.1})",
            layout.scale,
            layout.offset.x,
            layout.offset.y
        );
        PrintJob::Composed {
            layout,
            delay_ms: self.config().print_delay_ms,
        }
    }

    /// Undo [`begin_print`](Self::begin_print). Returns the damage to push
    /// when the tree changed.
    pub fn finish_print(&mut self, job: PrintJob) -> Option<Damage> {
        self.printing = false;
        match job {
            PrintJob::Immediate if self.scene().is_empty() => None,
            PrintJob::Immediate => Some(self.render(RenderScope::Full)),
            PrintJob::Composed { .. } => {
                self.tree_mut().set_print_layout(None);
                Some(self.render(RenderScope::Full))
            }
        }
    }
}

/// Run a whole print against a synchronous host.
pub fn print_with<H: PrintHost>(engine: &mut BoardEngine, host: &mut H) -> Option<Damage> {
    let job = engine.begin_print();
    if let PrintJob::Composed { delay_ms, .. } = job {
        host.set_preview(true);
        host.pause(delay_ms);
        host.print();
        host.set_preview(false);
    } else {
        host.print();
    }
    engine.finish_print(job)
}
