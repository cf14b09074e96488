mod create;
mod delete;
mod list;

pub use self::create::*;
pub use self::delete::*;
pub use self::list::*;
