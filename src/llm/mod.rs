use async_trait::async_trait;

pub mod anthropic;
pub mod prompt;

/// The remote text-generation call gated by the usage ledger.
///
/// Opaque to callers: text in, text out, no retries.
#[async_trait]
pub trait MeteredAction: Send + Sync {
    async fn invoke(&self, system_prompt: &str, user_message: &str) -> anyhow::Result<String>;

    /// Whether the backend has what it needs to be called at all.
    fn is_configured(&self) -> bool;
}

#[cfg(test)]
pub mod fake {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Echoes the prompt back, or fails on demand.
    #[derive(Default)]
    pub struct ScriptedLlm {
        pub calls: AtomicUsize,
        pub fail: AtomicBool,
        pub last_user_message: Mutex<Option<String>>,
    }

    #[async_trait]
    impl MeteredAction for ScriptedLlm {
        async fn invoke(&self, _system_prompt: &str, user_message: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_user_message.lock().unwrap() = Some(user_message.to_string());
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("scripted failure");
            }
            Ok(format!("suggestion for: {user_message}"))
        }

        fn is_configured(&self) -> bool {
            true
        }
    }
}
