pub mod ai;
pub mod backend;
pub mod calendar;
pub mod conversation;
pub mod materializer;
pub mod sanitizer;
pub mod sessions;
pub mod speech;
pub mod temporal;
