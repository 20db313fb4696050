use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Health {
    pub status: String,
    pub message: String,
    #[serde(rename = "usuarios_registrados")]
    pub registered_users: usize,
}

impl Health {
    pub fn ok(registered_users: usize) -> Self {
        Self {
            status: "ok".into(),
            message: "Servidor funcionando correctamente".into(),
            registered_users,
        }
    }
}

/// One entry of the endpoint table in [`ServiceInfo`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EndpointInfo {
    pub method: String,
    pub path: String,
    pub description: String,
}

/// Static description served on `GET /`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub status: String,
    pub endpoints: Vec<EndpointInfo>,
}
