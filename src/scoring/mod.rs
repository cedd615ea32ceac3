pub mod genres;
pub mod scorer;
pub mod session;
pub mod summary;


pub use genres::*;
pub use scorer::*;
pub use session::*;
pub use summary::*;
