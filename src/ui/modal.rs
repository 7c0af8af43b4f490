use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Open/closed flag shared by everything that drives one modal dialog
#[derive(Debug, Clone, Default)]
pub struct ModalState {
    open: Arc<AtomicBool>,
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        self.open.store(true, Ordering::Release);
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}
