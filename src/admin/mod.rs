//! Admin panel registry.
//!
//! Admin plugins declare their menu entry, permission gate and lazily loaded
//! page during startup. The registry is frozen once every plugin has been
//! registered and bootstrapped, and is only read afterwards.

mod app;
mod plugins;

pub use app::{
    AdminApp, AdminError, AdminPage, ComponentLoader, Icon, IntlLabel, MenuLink, Permission,
    PluginDescriptor,
};
pub use plugins::{default_plugins, AdminPlugin, AiTextGenerationPlugin, NewsletterPlugin};
