// Session auth: signed-token cookies over derived principals, plus the
// LinkedIn OAuth relay that feeds the identity bridge.

pub mod handlers;
pub mod jwt;
pub mod linkedin;
pub mod session;
