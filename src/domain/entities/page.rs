use serde::{Deserialize, Serialize};

/// Pages of the console that can be gated by a permission record.
///
/// Stored permission records are keyed by `as_str()`; the enum only exists so
/// routes and navigation cannot name a page that is not handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Dashboard,
    Catalogo,
    Importers,
    Configuracion,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::Dashboard,
        Page::Catalogo,
        Page::Importers,
        Page::Configuracion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Catalogo => "catalogo",
            Page::Importers => "importers",
            Page::Configuracion => "configuracion",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Inicio",
            Page::Catalogo => "Catálogo",
            Page::Importers => "Importadores",
            Page::Configuracion => "Configuración",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Page::Dashboard => "/dashboard",
            Page::Catalogo => "/catalogo",
            Page::Importers => "/importers",
            Page::Configuracion => "/configuracion",
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .iter()
            .copied()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| format!("Unknown page: {}", s))
    }
}

/// Where an unauthenticated visitor is sent.
pub const LOGIN_PATH: &str = "/";
/// Where an authenticated visitor without permission is sent.
pub const ACCESS_DENIED_PATH: &str = "/access-denied";
