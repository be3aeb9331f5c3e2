// crates/sunscan-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for future localization support.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The Sunscan CLI stores user-facing strings in a small translation catalog
//! to enforce consistent messaging and to prepare for future locales. All
//! runtime output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - Variants are stable for CLI parsing and catalog lookup.
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "ca" => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
///
/// # Invariants
/// - Ordering is stable for deterministic presentation.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries loaded into the localized message bundle.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "sunscan {version}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine translated and may be inaccurate.",
    ),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.render_failed", "Failed to render JSON output: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("client.init_failed", "Failed to initialize API client: {error}"),
    ("auth.email.missing", "No email given: pass --email or set account.email in sunscan.toml."),
    ("auth.email.invalid", "Invalid email: {error}"),
    ("auth.password.env_missing", "Set {env} to the account password before running this command."),
    ("auth.password.invalid", "Invalid password: {error}"),
    ("auth.username.invalid", "Invalid username: {error}"),
    ("auth.age.invalid", "Invalid age: {error}"),
    ("token.missing", "No token given: pass --token, --token-file, or set {env}."),
    ("token.read_failed", "Failed to read token file at {path}: {error}"),
    ("token.invalid", "Invalid token: {error}"),
    ("token.file_too_large", "Token file at {path} exceeds {limit} bytes."),
    ("id.invalid", "Identifiers are 1-based; {value} is not valid."),
    ("page.invalid", "Invalid page request: {error}"),
    ("login.failed", "Login failed: {error}"),
    ("login.ok", "Login successful for {email} (user id {id})."),
    ("login.token_written", "Access token written to {path}."),
    ("login.token_write_failed", "Failed to write token file at {path}: {error}"),
    ("register.failed", "Registration failed: {error}"),
    ("register.ok", "Registered user {username} (id {id})."),
    ("profile.get.failed", "Failed to get profile: {error}"),
    ("profile.update.failed", "Failed to update profile: {error}"),
    ("profile.update.ok", "Profile updated for user id {id}."),
    ("profile.update.nothing", "Nothing to update: pass --username, --age, or --set-password."),
    ("profile.delete.failed", "Failed to delete user: {error}"),
    ("profile.delete.ok", "{message}"),
    ("profile.line.id", "User id: {id}"),
    ("profile.line.username", "Username: {username}"),
    ("profile.line.email", "Email: {email}"),
    ("profile.line.age", "Age: {age}"),
    ("profile.line.created", "Created: {created}"),
    ("profile.line.updated", "Updated: {updated}"),
    ("users.failed", "Failed to list users: {error}"),
    ("users.header", "Known accounts: {total}"),
    ("users.line", "{id}: {username} <{email}>"),
    ("history.failed", "Failed to get history: {error}"),
    ("history.header", "Prediction history: {total} total (page {page} of {pages})"),
    ("history.empty", "No prediction history found for this user."),
    ("history.line", "{index}. Analysis {id}: {label} ({confidence})"),
    ("history.line.image", "   Image: {filename}"),
    ("history.line.date", "   Date: {created}"),
    ("history.line.url", "   Image URL: {url}"),
    ("analysis.failed", "Failed to get analysis: {error}"),
    ("analysis.header", "Analysis {id}: {label} ({confidence})"),
    ("analysis.breakdown.header", "All predictions:"),
    ("analysis.breakdown.line", "  {label}: {score}"),
    ("model.info.failed", "Failed to get model info: {error}"),
    ("model.info.name", "Model: {name}"),
    ("model.info.file", "Artifact: {file}"),
    ("model.info.classes", "Classes: {classes}"),
    ("model.info.input", "Input size: {input}"),
    ("model.info.description", "{description}"),
    ("model.health.failed", "Failed to get model health: {error}"),
    ("model.health.ok", "Model healthy: {message}"),
    ("model.health.bad", "Model unhealthy: {error}"),
    ("smoke.step.login", "Step 1: logging in as {email}..."),
    ("smoke.step.history", "Step 2: fetching prediction history..."),
    ("smoke.history.total", "Total predictions: {total}"),
    ("smoke.recent.header", "Recent predictions:"),
    ("smoke.step.page2", "Step 3: fetching page 2..."),
    ("smoke.page2.count", "Page 2 holds {count} more predictions."),
    ("smoke.step.detail", "Step 4: fetching analysis {id}..."),
    ("smoke.detail.consistent", "Detail agrees with the listing entry."),
    ("smoke.detail.breakdown", "Breakdown covers {count} classes (score sum {sum})."),
    ("smoke.ok", "Smoke flow completed."),
    ("smoke.failed", "Smoke flow failed: {error}"),
    ("smoke.hint.connection", "Connection error: is the server running at {base_url}?"),
];

/// Static Catalan catalog entries loaded into the localized message bundle.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "sunscan {version}"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    ("output.render_failed", "No s'ha pogut generar la sortida JSON: {error}"),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    ("config.validate.ok", "Configuració vàlida."),
    ("client.init_failed", "No s'ha pogut inicialitzar el client de l'API: {error}"),
    (
        "auth.email.missing",
        "No s'ha indicat cap correu: passeu --email o definiu account.email a sunscan.toml.",
    ),
    ("auth.email.invalid", "Correu no vàlid: {error}"),
    (
        "auth.password.env_missing",
        "Definiu {env} amb la contrasenya del compte abans d'executar aquesta ordre.",
    ),
    ("auth.password.invalid", "Contrasenya no vàlida: {error}"),
    ("auth.username.invalid", "Nom d'usuari no vàlid: {error}"),
    ("auth.age.invalid", "Edat no vàlida: {error}"),
    ("token.missing", "No s'ha indicat cap token: passeu --token, --token-file o definiu {env}."),
    ("token.read_failed", "No s'ha pogut llegir el fitxer de token a {path}: {error}"),
    ("token.invalid", "Token no vàlid: {error}"),
    ("token.file_too_large", "El fitxer de token a {path} supera els {limit} bytes."),
    ("id.invalid", "Els identificadors comencen per 1; {value} no és vàlid."),
    ("page.invalid", "Sol·licitud de pàgina no vàlida: {error}"),
    ("login.failed", "No s'ha pogut iniciar la sessió: {error}"),
    ("login.ok", "Inici de sessió correcte per a {email} (id d'usuari {id})."),
    ("login.token_written", "Token d'accés escrit a {path}."),
    ("login.token_write_failed", "No s'ha pogut escriure el fitxer de token a {path}: {error}"),
    ("register.failed", "No s'ha pogut registrar el compte: {error}"),
    ("register.ok", "S'ha registrat l'usuari {username} (id {id})."),
    ("profile.get.failed", "No s'ha pogut obtenir el perfil: {error}"),
    ("profile.update.failed", "No s'ha pogut actualitzar el perfil: {error}"),
    ("profile.update.ok", "Perfil actualitzat per a l'usuari amb id {id}."),
    (
        "profile.update.nothing",
        "No hi ha res a actualitzar: passeu --username, --age o --set-password.",
    ),
    ("profile.delete.failed", "No s'ha pogut suprimir l'usuari: {error}"),
    ("profile.delete.ok", "{message}"),
    ("profile.line.id", "Id d'usuari: {id}"),
    ("profile.line.username", "Nom d'usuari: {username}"),
    ("profile.line.email", "Correu: {email}"),
    ("profile.line.age", "Edat: {age}"),
    ("profile.line.created", "Creat: {created}"),
    ("profile.line.updated", "Actualitzat: {updated}"),
    ("users.failed", "No s'ha pogut llistar els usuaris: {error}"),
    ("users.header", "Comptes coneguts: {total}"),
    ("users.line", "{id}: {username} <{email}>"),
    ("history.failed", "No s'ha pogut obtenir l'historial: {error}"),
    ("history.header", "Historial de prediccions: {total} en total (pàgina {page} de {pages})"),
    ("history.empty", "No s'ha trobat cap historial de prediccions per a aquest usuari."),
    ("history.line", "{index}. Anàlisi {id}: {label} ({confidence})"),
    ("history.line.image", "   Imatge: {filename}"),
    ("history.line.date", "   Data: {created}"),
    ("history.line.url", "   URL de la imatge: {url}"),
    ("analysis.failed", "No s'ha pogut obtenir l'anàlisi: {error}"),
    ("analysis.header", "Anàlisi {id}: {label} ({confidence})"),
    ("analysis.breakdown.header", "Totes les prediccions:"),
    ("analysis.breakdown.line", "  {label}: {score}"),
    ("model.info.failed", "No s'ha pogut obtenir la informació del model: {error}"),
    ("model.info.name", "Model: {name}"),
    ("model.info.file", "Artefacte: {file}"),
    ("model.info.classes", "Classes: {classes}"),
    ("model.info.input", "Mida d'entrada: {input}"),
    ("model.info.description", "{description}"),
    ("model.health.failed", "No s'ha pogut obtenir l'estat del model: {error}"),
    ("model.health.ok", "Model en bon estat: {message}"),
    ("model.health.bad", "Model en mal estat: {error}"),
    ("smoke.step.login", "Pas 1: iniciant sessió com a {email}..."),
    ("smoke.step.history", "Pas 2: obtenint l'historial de prediccions..."),
    ("smoke.history.total", "Prediccions totals: {total}"),
    ("smoke.recent.header", "Prediccions recents:"),
    ("smoke.step.page2", "Pas 3: obtenint la pàgina 2..."),
    ("smoke.page2.count", "La pàgina 2 conté {count} prediccions més."),
    ("smoke.step.detail", "Pas 4: obtenint l'anàlisi {id}..."),
    ("smoke.detail.consistent", "El detall coincideix amb l'entrada del llistat."),
    ("smoke.detail.breakdown", "El desglossament cobreix {count} classes (suma {sum})."),
    ("smoke.ok", "Flux de prova completat."),
    ("smoke.failed", "El flux de prova ha fallat: {error}"),
    ("smoke.hint.connection", "Error de connexió: el servidor s'està executant a {base_url}?"),
];

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Ca => CATALOG_CA_MAP.get_or_init(|| CATALOG_CA.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let locale = current_locale();
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions are permitted."
    )]

    use super::Locale;
    use super::MessageArg;
    use super::catalog_for;
    use super::translate;

    #[test]
    fn locale_parse_accepts_region_tags() {
        assert_eq!(Locale::parse("ca-ES"), Some(Locale::Ca));
        assert_eq!(Locale::parse("EN_us"), Some(Locale::En));
        assert_eq!(Locale::parse("fr"), None);
        assert_eq!(Locale::parse(""), None);
    }

    #[test]
    fn unknown_keys_fall_back_to_the_key_itself() {
        assert_eq!(translate("no.such.key", Vec::new()), "no.such.key");
    }

    #[test]
    fn placeholders_substitute_in_order() {
        let args = vec![MessageArg::new("env", "SUNSCAN_LANG"), MessageArg::new("value", "xx")];
        let message = translate("i18n.lang.invalid_env", args);
        assert!(message.contains("SUNSCAN_LANG"));
        assert!(message.contains("xx"));
    }

    #[test]
    fn catalan_catalog_covers_every_english_key() {
        let english = catalog_for(Locale::En);
        let catalan = catalog_for(Locale::Ca);
        for key in english.keys() {
            assert!(catalan.contains_key(key), "missing catalan entry for {key}");
        }
    }
}
