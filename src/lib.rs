//! # OrderShell — noyau de navigation d'une app de commande
//!
//! Une app mobile affiche un unique site de commande dans une surface de
//! navigation embarquée. Ce crate contient la logique qui la fait passer pour
//! une app native : le pare-feu de navigation par URL, le suivi de
//! connectivité et le script injecté dans chaque page.
//!
//! ## Architecture des modules
//!
//! - [`host`] : extraction du hostname et correspondance lâche par sous-chaîne.
//!
//! - [`rules`] : listes de domaines fixes (plateforme, paiement, apps externes).
//!
//! - [`classifier`] : verdict `Allow` / `ExternalHandoff` pour une URL, avec
//!   l'origine de l'autorisation.
//!
//! - [`engine`] : machine à états qui reçoit les événements de la surface,
//!   applique les verdicts avant et après navigation, gère le retour arrière
//!   et les popups.
//!
//! - [`surface`] / [`events`] : contrats des collaborateurs externes
//!   (surface, ouverture externe, bridge d'événements).
//!
//! - [`connectivity`] : moniteur de connectivité, indépendant de la politique.
//!
//! - [`script`] : générateur du script de suppression du chrome navigateur.
//!
//! - [`shell`] : câblage pour la couche de présentation (bannière hors-ligne,
//!   bouton retour matériel).
//!
//! - [`config`] : configuration TOML chargée au démarrage.

pub mod classifier;
pub mod config;
pub mod connectivity;
pub mod engine;
pub mod events;
pub mod host;
pub mod rules;
pub mod script;
pub mod shell;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;
