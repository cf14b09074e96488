mod create;
mod import;
mod list;

pub use self::create::*;
pub use self::import::*;
pub use self::list::*;
