use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use milan_shared::{AppError, AppResult, ErrorCode};

use super::membership_service::{self, UsageCounter};
use super::{profile_service, validate_input};
use crate::models::{Chat, Message, MessageInput};
use crate::repository::Store;

pub fn get(store: &dyn Store, id: Uuid) -> AppResult<Message> {
    store
        .messages()
        .get_by_id(id)?
        .ok_or_else(|| AppError::new(ErrorCode::MessageNotFound, "message not found"))
}

pub fn send(store: &dyn Store, input: MessageInput) -> AppResult<Message> {
    validate_input(&input)?;
    if input.sender_profile_id == input.receiver_profile_id {
        return Err(AppError::new(ErrorCode::CannotMessageSelf, "a profile cannot message itself"));
    }
    profile_service::get(store, input.sender_profile_id)?;
    profile_service::get(store, input.receiver_profile_id)?;

    let message = store.messages().add(&Message {
        id: Uuid::now_v7(),
        sender_profile_id: input.sender_profile_id,
        receiver_profile_id: input.receiver_profile_id,
        content: input.content,
        sent_at: Utc::now(),
        is_read: false,
    })?;

    membership_service::bump_usage(store, message.sender_profile_id, UsageCounter::Chats)?;
    Ok(message)
}

/// Messages exchanged by the two profiles, oldest first.
pub fn conversation(store: &dyn Store, profile_id: Uuid, partner_id: Uuid) -> AppResult<Vec<Message>> {
    let mut messages = store.messages().between(profile_id, partner_id)?;
    messages.sort_by_key(|m| m.sent_at);
    Ok(messages)
}

/// One entry per partner, most recently active conversation first.
pub fn chats(store: &dyn Store, profile_id: Uuid) -> AppResult<Vec<Chat>> {
    let mut by_partner: HashMap<Uuid, Chat> = HashMap::new();

    for message in store.messages().involving(profile_id)? {
        let unread = usize::from(message.receiver_profile_id == profile_id && !message.is_read);
        let partner = message.partner_of(profile_id);

        match by_partner.get_mut(&partner) {
            Some(chat) => {
                chat.unread_count += unread;
                if message.sent_at >= chat.last_message.sent_at {
                    chat.last_message = message;
                }
            }
            None => {
                by_partner.insert(
                    partner,
                    Chat {
                        partner_profile_id: partner,
                        last_message: message,
                        unread_count: unread,
                    },
                );
            }
        }
    }

    let mut chats: Vec<Chat> = by_partner.into_values().collect();
    chats.sort_by_key(|chat| std::cmp::Reverse((chat.last_message.sent_at, chat.last_message.id)));
    Ok(chats)
}

/// Mark everything `partner_id` sent to `profile_id` as read.
pub fn mark_read(store: &dyn Store, profile_id: Uuid, partner_id: Uuid) -> AppResult<usize> {
    let mut changed = 0;
    for mut message in store.messages().between(profile_id, partner_id)? {
        if message.receiver_profile_id != profile_id || message.is_read {
            continue;
        }
        message.is_read = true;
        if store.messages().update(&message)?.is_some() {
            changed += 1;
        }
    }
    Ok(changed)
}

pub fn delete(store: &dyn Store, id: Uuid) -> AppResult<()> {
    if !store.messages().delete_by_id(id)? {
        return Err(AppError::new(ErrorCode::MessageNotFound, "message not found"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use milan_shared::ErrorKind;

    use crate::models::{MembershipType, Profile};
    use crate::repository::MemoryStore;
    use crate::test_support::{seed_membership, seed_profile, store_with_profile};

    fn say(store: &MemoryStore, from: &Profile, to: &Profile, content: &str) -> Message {
        send(
            store,
            MessageInput {
                sender_profile_id: from.id,
                receiver_profile_id: to.id,
                content: content.into(),
            },
        )
        .unwrap()
    }

    #[test]
    fn conversation_is_oldest_first_and_scoped_to_the_pair() {
        let (store, user, a) = store_with_profile();
        let b = seed_profile(&store, user.id);
        let c = seed_profile(&store, user.id);

        let first = say(&store, &a, &b, "namaste");
        say(&store, &a, &c, "hello c");
        let second = say(&store, &b, &a, "namaste ji");

        let messages = conversation(&store, a.id, b.id).unwrap();
        assert_eq!(messages, vec![first, second]);
    }

    #[test]
    fn chats_group_by_partner_with_unread_counts() {
        let (store, user, a) = store_with_profile();
        let b = seed_profile(&store, user.id);
        let c = seed_profile(&store, user.id);

        say(&store, &b, &a, "hi");
        say(&store, &b, &a, "are you there?");
        say(&store, &a, &c, "hello");
        let latest = say(&store, &c, &a, "hey!");

        let chats = chats(&store, a.id).unwrap();
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].partner_profile_id, c.id);
        assert_eq!(chats[0].last_message, latest);
        assert_eq!(chats[0].unread_count, 1);
        assert_eq!(chats[1].partner_profile_id, b.id);
        assert_eq!(chats[1].unread_count, 2);
    }

    #[test]
    fn mark_read_only_touches_received_messages() {
        let (store, user, a) = store_with_profile();
        let b = seed_profile(&store, user.id);
        say(&store, &b, &a, "one");
        say(&store, &b, &a, "two");
        say(&store, &a, &b, "reply");

        assert_eq!(mark_read(&store, a.id, b.id).unwrap(), 2);
        assert_eq!(mark_read(&store, a.id, b.id).unwrap(), 0);

        let chats = chats(&store, b.id).unwrap();
        assert_eq!(chats[0].unread_count, 1);
    }

    #[test]
    fn invalid_messages_are_refused() {
        let (store, user, a) = store_with_profile();
        let b = seed_profile(&store, user.id);

        let err = send(
            &store,
            MessageInput { sender_profile_id: a.id, receiver_profile_id: a.id, content: "me".into() },
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SelfReference);

        let err = send(
            &store,
            MessageInput { sender_profile_id: a.id, receiver_profile_id: b.id, content: String::new() },
        )
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::ValidationError));

        let err = send(
            &store,
            MessageInput { sender_profile_id: a.id, receiver_profile_id: Uuid::now_v7(), content: "hi".into() },
        )
        .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::ProfileNotFound));
    }

    #[test]
    fn sending_counts_chats_for_the_sender() {
        let (store, user, a) = store_with_profile();
        let b = seed_profile(&store, user.id);
        seed_membership(&store, a.id, MembershipType::Premium);

        say(&store, &a, &b, "hi");
        say(&store, &a, &b, "again");

        let membership = store.memberships().find_by_profile(a.id).unwrap().unwrap();
        assert_eq!(membership.chats_count, 2);
    }

    #[test]
    fn get_and_delete() {
        let (store, user, a) = store_with_profile();
        let b = seed_profile(&store, user.id);
        let message = say(&store, &a, &b, "hi");

        assert_eq!(get(&store, message.id).unwrap(), message);
        delete(&store, message.id).unwrap();
        assert_eq!(get(&store, message.id).unwrap_err().code(), Some(ErrorCode::MessageNotFound));
    }
}
