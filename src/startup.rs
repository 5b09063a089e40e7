use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::admin::{default_plugins, AdminApp};
use crate::config::{DatabaseSettings, Settings, StorageBackend};
use crate::routes::{
    handle_admin_menu, handle_create_newsletter, handle_delete_newsletter,
    handle_find_newsletter, handle_find_newsletters, handle_subscribe, handle_unsubscribe,
    handle_update_newsletter, handle_update_newsletter_status, health_check, json_error_handler,
    query_error_handler,
};
use crate::store::{
    InMemoryNewsletterStore, InMemorySubscriberStore, NewsletterStore, PostgresNewsletterStore,
    PostgresSubscriberStore, SubscriberStore,
};

pub struct Application {
    pub port: u16,
    pub server: Server,
}

/// Store handles shared by every worker.
#[derive(Clone)]
pub struct Stores {
    pub subscribers: Arc<dyn SubscriberStore>,
    pub newsletters: Arc<dyn NewsletterStore>,
}

impl Stores {
    pub fn from_config(config: &Settings) -> Self {
        match config.get_storage_backend() {
            StorageBackend::Postgres => Stores::postgres(get_connection_db_pool(&config.database)),
            StorageBackend::Memory => Stores::in_memory(),
        }
    }

    pub fn postgres(db_pool: PgPool) -> Self {
        Stores {
            subscribers: Arc::new(PostgresSubscriberStore::new(db_pool.clone())),
            newsletters: Arc::new(PostgresNewsletterStore::new(db_pool)),
        }
    }

    pub fn in_memory() -> Self {
        Stores {
            subscribers: Arc::new(InMemorySubscriberStore::new()),
            newsletters: Arc::new(InMemoryNewsletterStore::new()),
        }
    }
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let stores = Stores::from_config(&config);

        Self::build_with_stores(config, stores).await
    }

    pub async fn build_with_stores(
        config: Settings,
        stores: Stores,
    ) -> Result<Self, std::io::Error> {
        tracing::info!("Using {:?} storage backend", config.get_storage_backend());

        // Admin plugins are registered once, before the server accepts requests
        let admin_app = AdminApp::from_plugins(&default_plugins())
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(listener, stores, admin_app)?;

        tracing::info!("Server listening on {}", config.get_address());

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    stores: Stores,
    admin_app: AdminApp,
) -> Result<Server, std::io::Error> {
    let subscriber_store: web::Data<dyn SubscriberStore> = web::Data::from(stores.subscribers);
    let newsletter_store: web::Data<dyn NewsletterStore> = web::Data::from(stores.newsletters);
    let admin_app = web::Data::new(admin_app);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .route("/health_check", web::get().to(health_check))
            .route("/subscribe", web::post().to(handle_subscribe))
            .route("/unsubscribe", web::post().to(handle_unsubscribe))
            .service(
                web::resource("/newsletter")
                    .route(web::get().to(handle_find_newsletters))
                    .route(web::post().to(handle_create_newsletter)),
            )
            .service(
                web::resource("/newsletter/{id}")
                    .route(web::get().to(handle_find_newsletter))
                    .route(web::put().to(handle_update_newsletter))
                    .route(web::delete().to(handle_delete_newsletter)),
            )
            .route(
                "/newsletter/{id}/status",
                web::patch().to(handle_update_newsletter_status),
            )
            .route("/admin/menu", web::get().to(handle_admin_menu))
            .app_data(subscriber_store.clone())
            .app_data(newsletter_store.clone())
            .app_data(admin_app.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> Pool<Postgres> {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.get_db_options())
}
