use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::admin::{AdminApp, MenuLink, PluginDescriptor};
use crate::routes::ResourceEnvelope;

#[derive(Serialize, Debug)]
pub struct AdminMenuMeta<'a> {
    pub plugins: &'a [PluginDescriptor],
}

/// Menu declarations consumed by the admin UI shell.
#[tracing::instrument(name = "Listing admin menu links", skip(admin))]
pub async fn handle_admin_menu(admin: web::Data<AdminApp>) -> impl Responder {
    let body: ResourceEnvelope<&[MenuLink], AdminMenuMeta> = ResourceEnvelope {
        data: admin.menu_links(),
        meta: AdminMenuMeta {
            plugins: admin.plugins(),
        },
    };

    HttpResponse::Ok().json(body)
}
