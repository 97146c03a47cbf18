// Change notifications for live standings
//
// Services emit an event after every committed mutation so that connected
// clients can refresh their standings instead of polling.

// Public API - what other modules can use
pub use bus::EventBus;
pub use events::SessionEvent;

// Internal modules
mod bus;
mod events;
