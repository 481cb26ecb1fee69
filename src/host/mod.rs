//! Host-side collaborators: column-name cleaning, message rendering, settings

pub mod colnames;
pub mod messages;
pub mod settings;

pub use colnames::{DefaultNameCleaner, NameCleaner};
pub use messages::{catalog_for_locale, EnglishCatalog, I18nMessage, MessageArg, MessageCatalog};
pub use settings::Settings;
