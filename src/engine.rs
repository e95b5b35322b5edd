//! Moteur de politique de navigation.
//!
//! Reçoit les événements de la surface embarquée, consulte le
//! [`Classifier`] et décide : charger dans l'app, rediriger dans la surface
//! courante, ou confier l'URL au navigateur système.
//!
//! ## Machine à états
//!
//! ```text
//! Idle ──start/on_request(allow)──▶ Loading ──on_navigated──▶ Loaded
//!                                      ▲                         │
//!                                      └──on_request(allow)──────┤
//!                                      └──on_open_popup(allow)───┤
//!                                      └──request_go_back────────┘
//! ```
//!
//! `can_go_back` est orthogonal à la phase et suit le dernier
//! `NavigationEvent` reçu.
//!
//! ## Double point de contrôle
//!
//! Le hand-off est évalué avant la navigation (`on_request`) **et** après
//! (`on_navigated`) : une chaîne de redirections autorisée au départ peut
//! aboutir sur un hôte externe sans repasser par `on_request`.
//!
//! Le moteur est mono-thread (`&mut self`). Un hôte qui livre les
//! événements depuis plusieurs threads l'enveloppe dans un `Mutex` ; aucune
//! opération ne bloque.

use tracing::{debug, info, warn};
use url::Url;

use crate::classifier::{Classifier, PolicyVerdict};
use crate::config::Config;
use crate::events::AppEvent;
use crate::script::injected_script;
use crate::surface::{EventSink, ExternalOpener, Surface};

// ─────────────────────────────────────────────────────────────────────────────
// Événements et état
// ─────────────────────────────────────────────────────────────────────────────

/// Navigation sur le point de démarrer. La réponse du moteur décide si elle
/// continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEvent {
    pub url: String,
}

impl RequestEvent {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Navigation validée par la surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub url: String,
    pub can_go_back: bool,
}

impl NavigationEvent {
    pub fn new(url: impl Into<String>, can_go_back: bool) -> Self {
        Self {
            url: url.into(),
            can_go_back,
        }
    }
}

/// Réponse à un [`RequestEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDecision {
    pub proceed: bool,
    pub verdict: PolicyVerdict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
}

/// État lu par la couche de présentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineState {
    pub loading: bool,
    pub can_go_back: bool,
    /// Reflète le moniteur de connectivité ; n'influence aucun verdict.
    pub connected: bool,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            loading: false,
            can_go_back: false,
            connected: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PolicyEngine
// ─────────────────────────────────────────────────────────────────────────────

pub struct PolicyEngine<S, O, E> {
    classifier: Classifier,
    script: String,
    surface: S,
    opener: O,
    sink: E,
    state: EngineState,
    phase: LoadPhase,
    /// Document (URL sans fragment) ayant reçu le script. `None` dès qu'un
    /// nouveau chargement commence.
    injected_document: Option<String>,
}

impl<S, O, E> PolicyEngine<S, O, E>
where
    S: Surface,
    O: ExternalOpener,
    E: EventSink,
{
    pub fn new(classifier: Classifier, disable_zoom: bool, surface: S, opener: O, sink: E) -> Self {
        Self {
            classifier,
            script: injected_script(disable_zoom),
            surface,
            opener,
            sink,
            state: EngineState::default(),
            phase: LoadPhase::Idle,
            injected_document: None,
        }
    }

    /// Construit le moteur à partir de la configuration chargée au démarrage.
    pub fn from_config(config: &Config, surface: S, opener: O, sink: E) -> Self {
        Self::new(
            config.classifier(),
            config.display.disable_zoom,
            surface,
            opener,
            sink,
        )
    }

    /// Charge la page de départ. Elle ne passe pas par le classifieur : son
    /// hôte fait partie de la liste d'autorisation dérivée.
    pub fn start(&mut self, start_url: &str) {
        info!(url = start_url, "Loading start page");
        self.begin_load();
        self.surface.load_url(start_url);
    }

    /// Contrôle pré-navigation.
    ///
    /// Un verdict de hand-off ouvre l'URL à l'extérieur et arrête le
    /// chargement avant de retourner `proceed = false`.
    pub fn on_request(&mut self, request: &RequestEvent) -> RequestDecision {
        let verdict = self.classifier.classify(&request.url);
        if verdict.is_handoff() {
            self.surface.stop_loading();
            self.hand_off(&request.url);
            return RequestDecision {
                proceed: false,
                verdict,
            };
        }

        self.begin_load();
        RequestDecision {
            proceed: true,
            verdict,
        }
    }

    /// Contrôle post-navigation.
    pub fn on_navigated(&mut self, nav: &NavigationEvent) {
        self.phase = LoadPhase::Loaded;
        self.state.loading = false;
        self.state.can_go_back = nav.can_go_back;

        if self.classifier.classify(&nav.url).is_handoff() {
            warn!(url = %nav.url, "Committed navigation resolved to an external host");
            self.surface.stop_loading();
            self.hand_off(&nav.url);
            return;
        }

        // Une fois par document : les changements de fragment ne rechargent
        // pas la page, une redirection vers un autre document si.
        let document = document_key(&nav.url);
        if self.injected_document.as_deref() != Some(document.as_str()) {
            self.surface.inject_script(&self.script);
            self.injected_document = Some(document);
        }

        self.sink.emit(AppEvent::Navigation {
            url: nav.url.clone(),
            can_go_back: nav.can_go_back,
        });
    }

    /// Bouton retour matériel. Retourne `false` (sans commande à la surface)
    /// quand l'historique est vide, pour laisser l'appelant quitter l'app.
    pub fn request_go_back(&mut self) -> bool {
        if !self.state.can_go_back {
            return false;
        }
        debug!("Going back in surface history");
        self.begin_load();
        self.surface.go_back();
        true
    }

    /// Popup demandé par la page (fenêtre de paiement, `window.open`...).
    ///
    /// L'app n'a qu'une seule surface : la cible est soit confiée à
    /// l'extérieur, soit chargée à la place de la page courante.
    pub fn on_open_popup(&mut self, url: &str) {
        if self.classifier.classify(url).is_handoff() {
            self.hand_off(url);
            return;
        }
        debug!(url, "Popup redirected into the current surface");
        self.begin_load();
        self.surface.load_url(url);
        self.sink.emit(AppEvent::InternalNavigation {
            url: url.to_string(),
        });
    }

    /// Message posté par la page (`postMessage`).
    pub fn on_message(&mut self, data: impl Into<String>) {
        self.sink.emit(AppEvent::Message(data.into()));
    }

    /// Mis à jour par le moniteur de connectivité.
    pub fn set_connected(&mut self, connected: bool) {
        self.state.connected = connected;
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    fn begin_load(&mut self) {
        self.phase = LoadPhase::Loading;
        self.state.loading = true;
        self.injected_document = None;
    }

    /// Best-effort : un échec d'ouverture est journalisé puis ignoré.
    fn hand_off(&mut self, url: &str) {
        info!(url, "Opening outside the app");
        if let Err(e) = self.opener.open(url) {
            debug!(url, error = %e, "External open failed, ignoring");
        }
        self.sink.emit(AppEvent::ExternalLink {
            url: url.to_string(),
        });
    }
}

/// Identifie un document : l'URL sans son fragment.
fn document_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.into()
        }
        Err(_) => url.to_string(),
    }
}
