use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use super::plugins::AdminPlugin;

/// Icons known by the admin UI shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Icon {
    Mail,
    Magic,
}

/// Translatable label: the UI shell looks `id` up and falls back to `default_message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntlLabel {
    pub id: String,
    pub default_message: String,
}

/// Permission required to see a menu entry. `subject: None` means any subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permission {
    pub action: String,
    pub subject: Option<String>,
}

impl Permission {
    pub fn action(action: &str) -> Self {
        Permission {
            action: String::from(action),
            subject: None,
        }
    }
}

/// Page bundle the UI shell mounts when a menu entry is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPage {
    pub plugin_id: String,
    pub entry: String,
}

/// Resolves the page of a menu entry. Only called when the entry is opened.
pub type ComponentLoader = Box<dyn Fn() -> AdminPage + Send + Sync>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuLink {
    pub to: String,
    pub icon: Icon,
    pub intl_label: IntlLabel,
    pub permissions: Vec<Permission>,
    #[serde(skip)]
    pub component: ComponentLoader,
}

impl std::fmt::Debug for MenuLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuLink")
            .field("to", &self.to)
            .field("icon", &self.icon)
            .field("intl_label", &self.intl_label)
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}

impl MenuLink {
    pub fn load_component(&self) -> AdminPage {
        (self.component)()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginDescriptor {
    pub id: String,
    pub name: String,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AdminError {
    #[error("Menu path {0} must start with '/'")]
    InvalidMenuPath(String),
    #[error("Menu path {0} is already registered")]
    DuplicateMenuPath(String),
    #[error("Plugin {0} is already registered")]
    DuplicatePlugin(String),
}

/// Menu links and plugins declared by the admin plugins, in registration order.
#[derive(Debug, Default)]
pub struct AdminApp {
    menu_links: Vec<MenuLink>,
    plugins: Vec<PluginDescriptor>,
}

impl AdminApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers then bootstraps every plugin, in order.
    pub fn from_plugins(plugins: &[Box<dyn AdminPlugin>]) -> Result<Self, AdminError> {
        let mut app = Self::new();

        for plugin in plugins {
            plugin.register(&mut app)?;
        }
        for plugin in plugins {
            plugin.bootstrap(&app);
        }

        Ok(app)
    }

    pub fn add_menu_link(&mut self, link: MenuLink) -> Result<(), AdminError> {
        if !link.to.starts_with('/') {
            return Err(AdminError::InvalidMenuPath(link.to));
        }
        if self.menu_link(&link.to).is_some() {
            return Err(AdminError::DuplicateMenuPath(link.to));
        }

        debug!(path = %link.to, "registered admin menu link");
        self.menu_links.push(link);
        Ok(())
    }

    pub fn register_plugin(&mut self, plugin: PluginDescriptor) -> Result<(), AdminError> {
        if self.plugins.iter().any(|p| p.id == plugin.id) {
            return Err(AdminError::DuplicatePlugin(plugin.id));
        }

        debug!(plugin = %plugin.id, "registered admin plugin");
        self.plugins.push(plugin);
        Ok(())
    }

    pub fn menu_link(&self, path: &str) -> Option<&MenuLink> {
        self.menu_links.iter().find(|link| link.to == path)
    }

    pub fn menu_links(&self) -> &[MenuLink] {
        &self.menu_links
    }

    pub fn plugins(&self) -> &[PluginDescriptor] {
        &self.plugins
    }

    /// Ids of the registered plugins.
    pub fn features(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.id.as_str()).collect()
    }
}
