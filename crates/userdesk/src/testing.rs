//! Fixtures shared by the unit tests.

use userdesk_protocol::endpoints;
use userdesk_transport::{Method, ScriptedBackend};

use crate::{Userdesk, UserdeskBuilder};

pub(crate) fn user_json(id: i64, role: &str) -> String {
    user_json_with(id, role, "a@b.com", false)
}

pub(crate) fn user_json_with(id: i64, role: &str, email: &str, two_factor: bool) -> String {
    serde_json::json!({
        "id": id,
        "nombres": "Ana",
        "apellidos": "Pérez",
        "email": email,
        "rol": role,
        "fechaNacimiento": "1990-05-17",
        "estado": true,
        "telefono": "999",
        "dni": "123",
        "is2faEnabled": two_factor
    })
    .to_string()
}

pub(crate) fn desk(backend: &ScriptedBackend) -> Userdesk<ScriptedBackend> {
    UserdeskBuilder::new()
        .build_with_backend(backend.clone())
        .expect("valid config")
}

/// A client already signed in as user `id` with `role`, sitting on the
/// dashboard. The bootstrap request is consumed.
pub(crate) async fn signed_in(backend: &ScriptedBackend, id: i64, role: &str) -> Userdesk<ScriptedBackend> {
    backend.reply_json(Method::Get, endpoints::SESSION_USER, 200, user_json(id, role));
    let mut desk = desk(backend);
    desk.start("/").await.expect("starts");
    desk
}
