use tracing::info;

use super::app::{
    AdminApp, AdminError, AdminPage, ComponentLoader, Icon, IntlLabel, MenuLink, Permission,
    PluginDescriptor,
};

const PAGE_ENTRY: &str = "./pages/App";

/// An admin panel contributed to the UI shell.
pub trait AdminPlugin: Send + Sync {
    fn id(&self) -> &'static str;

    /// Declares the plugin's menu link and descriptor. Called once at startup.
    fn register(&self, app: &mut AdminApp) -> Result<(), AdminError>;

    /// Runs after every plugin has been registered.
    fn bootstrap(&self, app: &AdminApp) {
        info!(plugin = self.id(), features = ?app.features(), "admin plugin bootstrapped");
    }
}

fn lazy_page(plugin_id: &'static str) -> ComponentLoader {
    Box::new(move || AdminPage {
        plugin_id: String::from(plugin_id),
        entry: String::from(PAGE_ENTRY),
    })
}

/// Newsletter management panel, gated by the email settings permission.
pub struct NewsletterPlugin;

impl AdminPlugin for NewsletterPlugin {
    fn id(&self) -> &'static str {
        "newsletter"
    }

    fn register(&self, app: &mut AdminApp) -> Result<(), AdminError> {
        app.add_menu_link(MenuLink {
            to: String::from("/plugins/newsletter"),
            icon: Icon::Mail,
            intl_label: IntlLabel {
                id: String::from("newsletter.title"),
                default_message: String::from("Newsletter"),
            },
            permissions: vec![Permission::action("plugin::email.settings.read")],
            component: lazy_page(self.id()),
        })?;

        app.register_plugin(PluginDescriptor {
            id: String::from(self.id()),
            name: String::from("Newsletter"),
        })
    }
}

pub struct AiTextGenerationPlugin;

impl AdminPlugin for AiTextGenerationPlugin {
    fn id(&self) -> &'static str {
        "ai-text-generation"
    }

    fn register(&self, app: &mut AdminApp) -> Result<(), AdminError> {
        app.add_menu_link(MenuLink {
            to: String::from("/plugins/ai-text-generation"),
            icon: Icon::Magic,
            intl_label: IntlLabel {
                id: String::from("ai-text-generation.title"),
                default_message: String::from("AI Text Generation"),
            },
            permissions: vec![Permission::action(
                "plugin::ai-text-generation.settings.read",
            )],
            component: lazy_page(self.id()),
        })?;

        app.register_plugin(PluginDescriptor {
            id: String::from(self.id()),
            name: String::from("AI Text Generation"),
        })
    }
}

pub fn default_plugins() -> Vec<Box<dyn AdminPlugin>> {
    vec![Box::new(NewsletterPlugin), Box::new(AiTextGenerationPlugin)]
}
