/// Yields the bearer token for the active session, or `None` when the user is
/// signed out. Injected into every view-model so tests can control the
/// session without a real sign-in flow.
pub trait AuthTokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

impl<F> AuthTokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}
