//! Host notification.

/// Observer told when a login succeeds.
///
/// The signal carries no payload: the host re-reads `AuthService::current_staff`
/// and refreshes whatever depends on the staff member's permissions.
pub trait LoginListener {
    fn on_login_succeeded(&mut self);
}

impl<F> LoginListener for F
where
    F: FnMut(),
{
    fn on_login_succeeded(&mut self) {
        self();
    }
}
