mod admin_menu;
mod health_check;
mod newsletter_status;
mod newsletters;
mod response;
mod subscriptions;

pub use admin_menu::*;
pub use health_check::*;
pub use newsletter_status::*;
pub use newsletters::*;
pub use response::*;
pub use subscriptions::*;

/// Prints an error followed by every error in its `source` chain.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
