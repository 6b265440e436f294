pub mod lines;

#[cfg_attr(docsrs, doc(cfg(feature = "json")))]
#[cfg(feature = "json")]
pub mod json;

#[cfg_attr(docsrs, doc(cfg(feature = "sheet")))]
#[cfg(feature = "sheet")]
pub mod sheet;
