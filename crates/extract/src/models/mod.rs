mod lang;
mod name;
mod record;

pub use self::lang::LanguagePolicy;
pub use self::name::ItemName;
pub use self::record::{ItemKey, Record};
