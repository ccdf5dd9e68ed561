//! UseCase layer
//!
//! 1 つの受信イベントにつき 1 つのユースケースがあり、`EventDispatcher` が振り分けます。

mod authorize;
mod broadcast;
mod disconnect_participant;
mod dispatcher;
mod end_meeting;
mod error;
mod get_presence;
mod join_room;
mod kick_user;
mod leave_room;
mod send_message;
#[cfg(test)]
mod test_support;

pub use authorize::PrivilegedActionGuard;
pub use broadcast::RoomBroadcaster;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use dispatcher::EventDispatcher;
pub use end_meeting::EndMeetingUseCase;
pub use error::{
    AuthorizeError, DispatchError, EndMeetingError, GetPresenceError, KickError,
};
pub use get_presence::{GetPresenceUseCase, PresentUser, RoomPresenceDetail};
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use kick_user::KickUserUseCase;
pub use leave_room::{LeaveOutcome, LeaveRoomUseCase};
pub use send_message::SendMessageUseCase;
