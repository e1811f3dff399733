pub mod adapter;
pub mod event;

pub use adapter::EventAdapter;
pub use event::HostEvent;
