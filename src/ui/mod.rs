//! UI state owned by the application
//!
//! Created once at startup, handed to whoever needs it and cleared at
//! shutdown.

pub mod modal;
pub mod toast;

pub use modal::ModalState;
pub use toast::{NewToast, Toast, ToastStore, ToastVariant};

#[derive(Clone, Default)]
pub struct UiState {
    pub toasts: ToastStore,
    /// Branch picker shown from the booking flow
    pub branch_modal: ModalState,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn clear(&self) {
        self.toasts.clear().await;
        self.branch_modal.close();
    }
}
