pub mod event;

pub use event::{
    CreateEventRequest, Event, EventPatch, EventStatus, UpdateEventRequest, EVENT_POLICY,
};
