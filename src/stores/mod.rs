//! Where loose objects come from. The codec itself only sees inflated bytes;
//! these stores own the zlib layer and the `.git/objects` layout.

pub mod fs;
pub mod loose;
