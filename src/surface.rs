//! Contrats des collaborateurs externes pilotés par le moteur de navigation.
//!
//! Le moteur ne connaît ni la WebView ni la plateforme : il ne voit que ces
//! traits. L'hôte (application mobile, harnais de test, CLI) fournit les
//! implémentations.
//!
//! ```text
//! Surface embarquée ──RequestEvent/NavigationEvent──▶ PolicyEngine
//!        ▲                                               │
//!        └──── load_url / go_back / stop_loading ────────┤
//!                                                        ├──▶ ExternalOpener
//!                                                        └──▶ EventSink
//! ```

use thiserror::Error;

use crate::events::AppEvent;

/// Commandes que le moteur peut envoyer à la surface de navigation embarquée.
pub trait Surface {
    /// Charge `url` dans la surface courante (jamais dans une nouvelle fenêtre).
    fn load_url(&mut self, url: &str);

    fn go_back(&mut self);

    /// Interrompt le chargement en cours. Doit être synchrone vis-à-vis de
    /// l'appelant : une navigation refusée ne doit pas continuer à s'afficher.
    fn stop_loading(&mut self);

    /// Exécute `script` dans la page courante.
    fn inject_script(&mut self, script: &str);
}

/// Échec d'ouverture d'une URL hors de l'app.
#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("no handler registered for {0}")]
    NoHandler(String),
    #[error("hand-off cancelled by the user")]
    Cancelled,
    #[error("platform error: {0}")]
    Platform(String),
}

/// Ouvre une URL dans le navigateur système ou l'app concernée.
pub trait ExternalOpener {
    fn open(&mut self, url: &str) -> Result<(), HandoffError>;
}

/// Reçoit les événements d'observabilité émis par le moteur.
pub trait EventSink {
    fn emit(&mut self, event: AppEvent);
}
