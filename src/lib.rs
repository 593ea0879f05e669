pub mod error;
pub mod interpret;
pub mod io;
pub mod op;
pub mod program;
pub mod translate;



#[doc(inline)]
pub use error::*;

#[doc(inline)]
pub use interpret::*;

#[doc(inline)]
pub use op::*;

#[doc(inline)]
pub use program::*;

#[doc(inline)]
pub use translate::*;
