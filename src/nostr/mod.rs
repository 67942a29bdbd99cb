pub mod event;
pub mod kind;
pub mod message;
pub mod nip19;
pub mod verify;
