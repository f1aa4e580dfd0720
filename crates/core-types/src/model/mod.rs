pub mod action;
pub mod element;
pub mod page;
pub mod session;
