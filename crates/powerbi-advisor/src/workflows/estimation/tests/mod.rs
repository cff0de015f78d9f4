mod common;
mod routing;
mod service;
mod tier;
