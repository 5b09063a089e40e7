mod admin_menu;
mod newsletter_status;
mod postgres_store;
mod subscriptions;
