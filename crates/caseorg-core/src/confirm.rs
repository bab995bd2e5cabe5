//! Confirmation capability with graceful degradation.
//!
//! Hosts that can show a modal install a [`ConfirmDialog`]; when none is
//! installed the policy falls back to a blocking [`NativeConfirm`].

use async_trait::async_trait;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAnswer {
    Yes,
    No,
    /// Dismissed without choosing
    Closed,
}

impl ConfirmAnswer {
    pub fn is_yes(&self) -> bool {
        matches!(self, ConfirmAnswer::Yes)
    }
}

impl From<bool> for ConfirmAnswer {
    fn from(yes: bool) -> Self {
        if yes { ConfirmAnswer::Yes } else { ConfirmAnswer::No }
    }
}

/// Modal Yes/No/Close prompt
#[async_trait]
pub trait ConfirmDialog: Send + Sync {
    async fn ask(&self, title: &str, message: &str) -> ConfirmAnswer;
}

/// Blocking yes/no prompt, always available
pub trait NativeConfirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// Native confirm that refuses everything; used where no prompt can be shown
#[derive(Debug, Default, Clone, Copy)]
pub struct RefuseAll;

impl NativeConfirm for RefuseAll {
    fn confirm(&self, _message: &str) -> bool {
        false
    }
}

pub struct ConfirmPolicy {
    modal: Option<Box<dyn ConfirmDialog>>,
    native: Box<dyn NativeConfirm>,
}

impl ConfirmPolicy {
    pub fn new(native: impl NativeConfirm + 'static) -> Self {
        Self {
            modal: None,
            native: Box::new(native),
        }
    }

    pub fn with_modal(mut self, modal: impl ConfirmDialog + 'static) -> Self {
        self.modal = Some(Box::new(modal));
        self
    }

    pub fn has_modal(&self) -> bool {
        self.modal.is_some()
    }

    pub async fn confirm(&self, title: &str, message: &str) -> ConfirmAnswer {
        match &self.modal {
            Some(modal) => modal.ask(title, message).await,
            None => {
                debug!("no confirm modal installed, using native prompt");
                self.native.confirm(message).into()
            }
        }
    }
}

impl Default for ConfirmPolicy {
    fn default() -> Self {
        Self::new(RefuseAll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(ConfirmAnswer);

    #[async_trait]
    impl ConfirmDialog for Fixed {
        async fn ask(&self, _title: &str, _message: &str) -> ConfirmAnswer {
            self.0
        }
    }

    struct AlwaysYes;

    impl NativeConfirm for AlwaysYes {
        fn confirm(&self, _message: &str) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_modal_takes_precedence() {
        let policy = ConfirmPolicy::new(AlwaysYes).with_modal(Fixed(ConfirmAnswer::Closed));
        assert_eq!(policy.confirm("Delete", "Sure?").await, ConfirmAnswer::Closed);
    }

    #[tokio::test]
    async fn test_falls_back_to_native() {
        let policy = ConfirmPolicy::new(AlwaysYes);
        assert!(!policy.has_modal());
        assert_eq!(policy.confirm("Delete", "Sure?").await, ConfirmAnswer::Yes);

        let refusing = ConfirmPolicy::default();
        assert_eq!(refusing.confirm("Delete", "Sure?").await, ConfirmAnswer::No);
    }
}
