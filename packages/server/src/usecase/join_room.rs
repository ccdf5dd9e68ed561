//! UseCase: ルーム入室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 接続の登録、在室者の追加、userJoined / roomData の送信
//!
//! ### なぜこのテストが必要か
//! - 同じユーザーが複数タブから入室しても userJoined が 1 回だけ送られることを保証
//! - ルームを移動したとき、旧ルームの退室処理が新ルームの入室処理より先に行われることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ユーザーの入室
//! - エッジケース：同じユーザーの 2 つ目の接続からの入室
//! - エッジケース：別のルームへの移動
//! - エッジケース：同じ接続から別のユーザーとして入室

use std::sync::Arc;

use zemi_shared::time::Clock;

use crate::domain::{
    ConnectionId, OutboundEvent, PresenceSnapshot, RoomName, SharedSessionState, Timestamp,
    UserId,
};

use super::{
    broadcast::RoomBroadcaster,
    leave_room::{depart, release_connection},
};

/// 入室処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// 新たに在室者として追加されたか（false なら別の接続で既に在室していた）
    pub newly_present: bool,
    /// 入室後のルームのスナップショット
    pub snapshot: PresenceSnapshot,
}

/// ルーム入室のユースケース
pub struct JoinRoomUseCase {
    state: SharedSessionState,
    broadcaster: RoomBroadcaster,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        state: SharedSessionState,
        broadcaster: RoomBroadcaster,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state,
            broadcaster,
            clock,
        }
    }

    /// ルーム入室を実行
    ///
    /// # Arguments
    ///
    /// * `connection` - 入室イベントを送った接続
    /// * `room` - 入室するルーム
    /// * `user` - 入室するユーザー
    pub async fn execute(
        &self,
        connection: ConnectionId,
        room: RoomName,
        user: UserId,
    ) -> JoinOutcome {
        let mut state = self.state.lock().await;

        // 1. この接続が別のユーザーとして登録されていれば、先にそのユーザーから外す
        if let Some(previous_owner) = state.registry.find_identity(&connection) {
            if previous_owner != user {
                tracing::info!(
                    "Connection '{}' switches identity from '{}' to '{}'",
                    connection,
                    previous_owner,
                    user
                );
                release_connection(&mut state, &self.broadcaster, &previous_owner, &connection)
                    .await;
            }
        }

        // 2. 別のルームに在室していれば、旧ルームの退室処理を先に行う
        if let Some(prior) = state.registry.current_room(&user).cloned() {
            if prior != room {
                depart(&mut state, &self.broadcaster, &prior, &user).await;
                state.registry.set_current_room(&user, None);
            }
        }

        // 3. 接続を登録し、所属ルームを設定
        let now = Timestamp::new(self.clock.now_millis());
        state.registry.register_connection(&user, connection, now);
        state.registry.set_current_room(&user, Some(room.clone()));

        // 4. 在室者に追加
        let newly_present = state.presence.add_user(&room, &user);
        let snapshot = state.presence.snapshot(&room);

        // 5. 通知（新規在室のときだけ userJoined、roomData は常に送る）
        if newly_present {
            let joined = OutboundEvent::UserJoined {
                user: user.clone(),
                users: snapshot.users.clone(),
            };
            self.broadcaster
                .to_room_except(&state, &room, &connection, &joined)
                .await;
            tracing::info!(
                "User '{}' joined room '{}' ({} present)",
                user,
                room,
                snapshot.count
            );
        } else {
            tracing::debug!(
                "User '{}' opened another connection '{}' in room '{}'",
                user,
                connection,
                room
            );
        }
        self.broadcaster.room_data(&state, &room).await;

        JoinOutcome {
            newly_present,
            snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectionIdFactory;
    use crate::usecase::test_support::{
        RecordingMessagePusher, fixed_clock, room, shared_state, user, users,
    };

    fn create_usecase() -> (JoinRoomUseCase, Arc<RecordingMessagePusher>, SharedSessionState) {
        let state = shared_state();
        let pusher = RecordingMessagePusher::new();
        let usecase = JoinRoomUseCase::new(
            state.clone(),
            RoomBroadcaster::new(pusher.clone()),
            fixed_clock(),
        );
        (usecase, pusher, state)
    }

    #[tokio::test]
    async fn test_first_join_sends_room_data_to_joiner() {
        // テスト項目: 最初の入室者には roomData だけが届く
        // given (前提条件):
        let (usecase, pusher, state) = create_usecase();
        let alice_tab = ConnectionIdFactory::generate();

        // when (操作):
        let outcome = usecase.execute(alice_tab, room("math"), user("alice")).await;

        // then (期待する結果):
        assert!(outcome.newly_present);
        assert_eq!(outcome.snapshot.users, users(&["alice"]));
        assert_eq!(
            pusher.events_for(&alice_tab),
            vec![OutboundEvent::RoomData {
                users: users(&["alice"]),
                count: 1,
            }]
        );
        let state = state.lock().await;
        assert_eq!(state.registry.current_room(&user("alice")), Some(&room("math")));
    }

    #[tokio::test]
    async fn test_join_notifies_others_but_not_sender() {
        // テスト項目: 既存の在室者には userJoined が届き、送信者には届かない
        // given (前提条件):
        let (usecase, pusher, _state) = create_usecase();
        let alice_tab = ConnectionIdFactory::generate();
        let bob_tab = ConnectionIdFactory::generate();
        usecase.execute(alice_tab, room("math"), user("alice")).await;
        pusher.clear();

        // when (操作):
        usecase.execute(bob_tab, room("math"), user("bob")).await;

        // then (期待する結果):
        assert_eq!(
            pusher.events_for(&alice_tab),
            vec![
                OutboundEvent::UserJoined {
                    user: user("bob"),
                    users: users(&["alice", "bob"]),
                },
                OutboundEvent::RoomData {
                    users: users(&["alice", "bob"]),
                    count: 2,
                },
            ]
        );
        assert_eq!(pusher.names_for(&bob_tab), vec!["roomData"]);
    }

    #[tokio::test]
    async fn test_second_tab_does_not_duplicate_user_joined() {
        // テスト項目: 同じユーザーの 2 つ目のタブからの入室で userJoined は送られない
        // given (前提条件):
        let (usecase, pusher, state) = create_usecase();
        let bob_tab = ConnectionIdFactory::generate();
        let alice_tab1 = ConnectionIdFactory::generate();
        let alice_tab2 = ConnectionIdFactory::generate();
        usecase.execute(bob_tab, room("math"), user("bob")).await;

        // when (操作):
        usecase.execute(alice_tab1, room("math"), user("alice")).await;
        let second = usecase.execute(alice_tab2, room("math"), user("alice")).await;

        // then (期待する結果):
        assert!(!second.newly_present);
        assert_eq!(pusher.count_named("userJoined"), 1);
        // roomData は 2 回目の入室でも両方のタブに届く
        assert_eq!(pusher.names_for(&alice_tab1), vec!["roomData", "roomData"]);
        assert_eq!(pusher.names_for(&alice_tab2), vec!["roomData"]);
        let state = state.lock().await;
        assert_eq!(state.registry.connections(&user("alice")).len(), 2);
        assert_eq!(state.presence.snapshot(&room("math")).count, 2);
    }

    #[tokio::test]
    async fn test_switching_rooms_leaves_prior_room_first() {
        // テスト項目: ルーム移動時は旧ルームの退室通知が新ルームの入室通知より先に送られる
        // given (前提条件):
        let (usecase, pusher, state) = create_usecase();
        let alice_tab = ConnectionIdFactory::generate();
        let bob_tab = ConnectionIdFactory::generate();
        let carol_tab = ConnectionIdFactory::generate();
        usecase.execute(bob_tab, room("math"), user("bob")).await;
        usecase.execute(carol_tab, room("art"), user("carol")).await;
        usecase.execute(alice_tab, room("math"), user("alice")).await;
        pusher.clear();

        // when (操作):
        usecase.execute(alice_tab, room("art"), user("alice")).await;

        // then (期待する結果):
        let order: Vec<(ConnectionId, &'static str)> = pusher
            .deliveries()
            .iter()
            .map(|(connection, event)| (*connection, event.name()))
            .collect();
        assert_eq!(
            order,
            vec![
                (bob_tab, "userLeft"),
                (bob_tab, "roomData"),
                (carol_tab, "userJoined"),
                (carol_tab, "roomData"),
                (alice_tab, "roomData"),
            ]
        );
        let state = state.lock().await;
        assert!(!state.presence.contains(&room("math"), &user("alice")));
        assert!(state.presence.contains(&room("art"), &user("alice")));
        assert_eq!(state.registry.current_room(&user("alice")), Some(&room("art")));
    }

    #[tokio::test]
    async fn test_same_connection_joining_as_other_user_releases_previous_identity() {
        // テスト項目: 同じ接続から別ユーザーとして入室すると、前のユーザーは退室扱いになる
        // given (前提条件):
        let (usecase, pusher, state) = create_usecase();
        let shared_tab = ConnectionIdFactory::generate();
        let bob_tab = ConnectionIdFactory::generate();
        usecase.execute(bob_tab, room("math"), user("bob")).await;
        usecase.execute(shared_tab, room("math"), user("alice")).await;
        pusher.clear();

        // when (操作):
        usecase.execute(shared_tab, room("math"), user("dave")).await;

        // then (期待する結果):
        assert_eq!(
            pusher.names_for(&bob_tab),
            vec!["userLeft", "roomData", "userJoined", "roomData"]
        );
        let state = state.lock().await;
        assert!(!state.registry.contains(&user("alice")));
        assert_eq!(
            state.presence.snapshot(&room("math")).users,
            users(&["bob", "dave"])
        );
    }
}
