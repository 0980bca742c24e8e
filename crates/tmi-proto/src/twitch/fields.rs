//! The tag table.
//!
//! One `pub const` per known tag. Each entry also generates the matching
//! accessor on [`TypedMessage`], so adding a tag is a one-line change here.

use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::enums::{MessageId, SubPlan, UserType};
use super::field::{rules, Field};
use super::types::{Badge, BadgeInfo, Color, Emote};
use super::TypedMessage;

macro_rules! tag_fields {
    ($(
        $(#[$doc:meta])*
        $name:ident, $accessor:ident: $ty:ty = $key:literal => $rule:expr;
    )+) => {
        $(
            $(#[$doc])*
            pub const $name: Field<$ty> = Field { key: $key, rule: $rule };
        )+

        /// Every key in the table, in declaration order.
        pub const KEYS: &[&str] = &[$($key),+];

        impl TypedMessage {
            $(
                $(#[$doc])*
                pub fn $accessor(&self) -> Option<$ty> {
                    self.field(&$name)
                }
            )+
        }
    };
}

tag_fields! {
    // CLEARCHAT / CLEARMSG
    /// `ban-duration`: length of a timeout. Absent for permanent bans.
    BAN_DURATION, ban_duration: Duration = "ban-duration" => rules::duration_secs;
    /// `room-id`
    ROOM_ID, room_id: u64 = "room-id" => rules::integer::<u64>;
    /// `target-user-id`: the user who was banned or timed out.
    TARGET_USER_ID, target_user_id: u64 = "target-user-id" => rules::integer::<u64>;
    /// `tmi-sent-ts`
    TMI_SENT_TS, tmi_sent_ts: DateTime<Utc> = "tmi-sent-ts" => rules::timestamp_millis;
    /// `login`: author of a deleted message.
    LOGIN, login: String = "login" => rules::text;
    /// `target-msg-id`: the deleted message.
    TARGET_MSG_ID, target_msg_id: Uuid = "target-msg-id" => rules::uuid;

    // Sender identity
    BADGE_INFO, badge_info: BadgeInfo = "badge-info" => rules::badge_info;
    BADGES, badges: Vec<Badge> = "badges" => rules::badge_list;
    COLOR, color: Color = "color" => rules::color;
    DISPLAY_NAME, display_name: String = "display-name" => rules::text;
    /// `emote-sets`: the emote sets the user may use.
    EMOTE_SETS, emote_sets: Vec<u64> = "emote-sets" => rules::integer_list;
    TURBO, turbo: bool = "turbo" => rules::flag;
    USER_ID, user_id: u64 = "user-id" => rules::integer::<u64>;
    USER_TYPE, user_type: UserType = "user-type" => rules::enumeration::<UserType>;
    MOD, is_mod: bool = "mod" => rules::flag;
    SUBSCRIBER, subscriber: bool = "subscriber" => rules::flag;
    VIP, vip: bool = "vip" => rules::flag;
    FIRST_MSG, first_msg: bool = "first-msg" => rules::flag;
    RETURNING_CHATTER, returning_chatter: bool = "returning-chatter" => rules::flag;

    // PRIVMSG / USERNOTICE / NOTICE
    /// `msg-id`: which notice this is.
    MSG_ID, msg_id: MessageId = "msg-id" => rules::enumeration::<MessageId>;
    /// `bits`: cheer amount.
    BITS, bits: u64 = "bits" => rules::integer::<u64>;
    EMOTES, emotes: Vec<Emote> = "emotes" => rules::emote_list;
    /// `id`: the message's own id.
    ID, id: Uuid = "id" => rules::uuid;
    CLIENT_NONCE, client_nonce: String = "client-nonce" => rules::text;
    SYSTEM_MSG, system_msg: String = "system-msg" => rules::text;

    // Replies
    REPLY_PARENT_MSG_ID, reply_parent_msg_id: Uuid = "reply-parent-msg-id" => rules::uuid;
    REPLY_PARENT_USER_ID, reply_parent_user_id: u64 = "reply-parent-user-id" => rules::integer::<u64>;
    REPLY_PARENT_USER_LOGIN, reply_parent_user_login: String = "reply-parent-user-login" => rules::text;
    REPLY_PARENT_DISPLAY_NAME, reply_parent_display_name: String = "reply-parent-display-name" => rules::text;
    REPLY_PARENT_MSG_BODY, reply_parent_msg_body: String = "reply-parent-msg-body" => rules::text;
    /// `reply-thread-parent-msg-id`: the message that started the thread.
    REPLY_THREAD_PARENT_MSG_ID, reply_thread_parent_msg_id: Uuid = "reply-thread-parent-msg-id" => rules::uuid;
    REPLY_THREAD_PARENT_USER_LOGIN, reply_thread_parent_user_login: String = "reply-thread-parent-user-login" => rules::text;

    // Shared chat
    SOURCE_BADGES, source_badges: Vec<Badge> = "source-badges" => rules::badge_list;
    SOURCE_BADGE_INFO, source_badge_info: BadgeInfo = "source-badge-info" => rules::badge_info;
    SOURCE_ID, source_id: Uuid = "source-id" => rules::uuid;
    SOURCE_ROOM_ID, source_room_id: u64 = "source-room-id" => rules::integer::<u64>;
    SOURCE_MSG_ID, source_msg_id: MessageId = "source-msg-id" => rules::enumeration::<MessageId>;

    // ROOMSTATE
    EMOTE_ONLY, emote_only: bool = "emote-only" => rules::flag;
    /// `followers-only`: minutes a user must follow before chatting; `-1`
    /// when the mode is off.
    FOLLOWERS_ONLY, followers_only: i32 = "followers-only" => rules::integer::<i32>;
    R9K, r9k: bool = "r9k" => rules::flag;
    /// `slow`: seconds between messages, `0` when off.
    SLOW, slow: u32 = "slow" => rules::integer::<u32>;
    SUBS_ONLY, subs_only: bool = "subs-only" => rules::flag;

    // WHISPER
    MESSAGE_ID, message_id: u64 = "message-id" => rules::integer::<u64>;
    THREAD_ID, thread_id: String = "thread-id" => rules::text;

    // USERNOTICE parameters
    MSG_PARAM_CUMULATIVE_MONTHS, msg_param_cumulative_months: u32 = "msg-param-cumulative-months" => rules::integer::<u32>;
    MSG_PARAM_DISPLAY_NAME, msg_param_display_name: String = "msg-param-displayName" => rules::text;
    MSG_PARAM_LOGIN, msg_param_login: String = "msg-param-login" => rules::text;
    MSG_PARAM_MONTHS, msg_param_months: u32 = "msg-param-months" => rules::integer::<u32>;
    MSG_PARAM_PROMO_GIFT_TOTAL, msg_param_promo_gift_total: u32 = "msg-param-promo-gift-total" => rules::integer::<u32>;
    MSG_PARAM_PROMO_NAME, msg_param_promo_name: String = "msg-param-promo-name" => rules::text;
    MSG_PARAM_RECIPIENT_DISPLAY_NAME, msg_param_recipient_display_name: String = "msg-param-recipient-display-name" => rules::text;
    MSG_PARAM_RECIPIENT_ID, msg_param_recipient_id: u64 = "msg-param-recipient-id" => rules::integer::<u64>;
    MSG_PARAM_RECIPIENT_USER_NAME, msg_param_recipient_user_name: String = "msg-param-recipient-user-name" => rules::text;
    MSG_PARAM_SENDER_LOGIN, msg_param_sender_login: String = "msg-param-sender-login" => rules::text;
    MSG_PARAM_SENDER_NAME, msg_param_sender_name: String = "msg-param-sender-name" => rules::text;
    MSG_PARAM_SHOULD_SHARE_STREAK, msg_param_should_share_streak: bool = "msg-param-should-share-streak" => rules::flag;
    MSG_PARAM_STREAK_MONTHS, msg_param_streak_months: u32 = "msg-param-streak-months" => rules::integer::<u32>;
    MSG_PARAM_SUB_PLAN, msg_param_sub_plan: SubPlan = "msg-param-sub-plan" => rules::enumeration::<SubPlan>;
    MSG_PARAM_SUB_PLAN_NAME, msg_param_sub_plan_name: String = "msg-param-sub-plan-name" => rules::text;
    /// `msg-param-viewerCount`: size of a raid.
    MSG_PARAM_VIEWER_COUNT, msg_param_viewer_count: u32 = "msg-param-viewerCount" => rules::integer::<u32>;
    /// `msg-param-threshold`: bits badge tier reached.
    MSG_PARAM_THRESHOLD, msg_param_threshold: u64 = "msg-param-threshold" => rules::integer::<u64>;
    MSG_PARAM_GIFT_MONTHS, msg_param_gift_months: u32 = "msg-param-gift-months" => rules::integer::<u32>;
}
