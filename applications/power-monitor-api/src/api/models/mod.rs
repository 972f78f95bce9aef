pub mod devices;
pub mod email;
pub mod settings;
pub mod tariff;

#[allow(unused_imports)]
pub use devices::*;
#[allow(unused_imports)]
pub use email::*;
#[allow(unused_imports)]
pub use settings::*;
#[allow(unused_imports)]
pub use tariff::*;
