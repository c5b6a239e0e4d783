//! Async conversation store.
//!
//! The store owns the conversation behind an `RwLock` so front ends can take
//! snapshots while a backend request is in flight. The lock is never held
//! across a backend call or a follow-up delay.
//!
//! Every reply is anchored to the message it answers. If that message was
//! deleted or edited while the reply was on its way, the reply is dropped
//! instead of appended; replies to untouched messages always land.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use cartchat_client::{SearchBackend, SearchReply};
use cartchat_core::{
    Attachment, Conversation, DeleteOutcome, Message, MessageId, ReactionKind, Reactions,
};

use crate::config::StoreConfig;
use crate::event::StoreEvent;
use crate::replies;

/// What prompted a backend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Text typed by the user.
    Send,
    /// A suggestion picked from the quick-start list.
    Suggestion,
    /// Replay after editing an earlier message.
    Edit,
}

impl Trigger {
    fn failure_text(self) -> &'static str {
        match self {
            Trigger::Send => replies::SEND_FAILED,
            Trigger::Suggestion | Trigger::Edit => replies::SEARCH_FAILED,
        }
    }
}

struct State {
    conversation: Conversation,
    /// Number of edits per message.
    revisions: HashMap<MessageId, u64>,
}

/// A message as it was when a reply to it was requested.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    id: MessageId,
    revision: u64,
}

impl State {
    fn revision(&self, id: &MessageId) -> u64 {
        self.revisions.get(id).copied().unwrap_or(0)
    }

    fn anchor(&self, id: MessageId) -> Anchor {
        Anchor {
            id,
            revision: self.revision(&id),
        }
    }

    fn anchor_last(&self) -> Option<Anchor> {
        self.conversation
            .messages()
            .last()
            .map(|m| self.anchor(*m.id()))
    }

    /// Whether the anchored message is still present and unedited.
    /// A reply with no anchor answers an empty conversation and always lands.
    fn is_current(&self, anchor: Option<Anchor>) -> bool {
        anchor.map_or(true, |a| {
            self.conversation.get(&a.id).is_some() && self.revision(&a.id) == a.revision
        })
    }

    fn forget_removed(&mut self) {
        let conversation = &self.conversation;
        self.revisions.retain(|id, _| conversation.get(id).is_some());
    }
}

/// Counts outstanding requests and follow-ups. Non-zero means typing.
#[derive(Clone)]
struct Typing {
    pending: Arc<AtomicUsize>,
    events: mpsc::UnboundedSender<StoreEvent>,
}

impl Typing {
    fn begin(&self) -> PendingGuard {
        if self.pending.fetch_add(1, Ordering::SeqCst) == 0 {
            self.events.send(StoreEvent::TypingChanged(true)).ok();
        }
        PendingGuard {
            typing: self.clone(),
        }
    }

    fn is_active(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }
}

/// Keeps the typing indicator on until dropped, on every exit path.
struct PendingGuard {
    typing: Typing,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if self.typing.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.typing.events.send(StoreEvent::TypingChanged(false)).ok();
        }
    }
}

/// Handle to a delayed assistant follow-up.
pub struct FollowUp(JoinHandle<()>);

impl FollowUp {
    /// Wait until the follow-up has been appended or discarded.
    pub async fn wait(self) {
        if let Err(e) = self.0.await {
            warn!(error = %e, "Follow-up task failed");
        }
    }
}

/// Result of a delete that matched a message.
pub struct Deletion {
    pub outcome: DeleteOutcome,
    /// Present when trailing messages were discarded.
    pub follow_up: Option<FollowUp>,
}

/// Conversation state shared between a front end and backend requests.
#[derive(Clone)]
pub struct ConversationStore {
    state: Arc<RwLock<State>>,
    backend: Arc<dyn SearchBackend>,
    config: StoreConfig,
    typing: Typing,
    events: mpsc::UnboundedSender<StoreEvent>,
}

impl ConversationStore {
    /// Create a store seeded with the assistant greetings.
    ///
    /// Returns the store and a receiver for [`StoreEvent`]s.
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        config: StoreConfig,
    ) -> (Self, mpsc::UnboundedReceiver<StoreEvent>) {
        Self::with_conversation(backend, config, Conversation::seeded())
    }

    /// Create a store over an existing conversation.
    pub fn with_conversation(
        backend: Arc<dyn SearchBackend>,
        config: StoreConfig,
        conversation: Conversation,
    ) -> (Self, mpsc::UnboundedReceiver<StoreEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let store = Self {
            state: Arc::new(RwLock::new(State {
                conversation,
                revisions: HashMap::new(),
            })),
            backend,
            config,
            typing: Typing {
                pending: Arc::new(AtomicUsize::new(0)),
                events: tx.clone(),
            },
            events: tx,
        };
        (store, rx)
    }

    /// Copy of the current message list.
    pub async fn snapshot(&self) -> Vec<Message> {
        self.state.read().await.conversation.messages().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.conversation.len()
    }

    pub async fn get(&self, id: &MessageId) -> Option<Message> {
        self.state.read().await.conversation.get(id).cloned()
    }

    pub async fn message_at(&self, index: usize) -> Option<Message> {
        self.state
            .read()
            .await
            .conversation
            .messages()
            .get(index)
            .cloned()
    }

    pub async fn suggestions_visible(&self) -> bool {
        self.state.read().await.conversation.suggestions_visible()
    }

    /// Whether the assistant is "typing": a request or follow-up is pending.
    pub fn is_awaiting(&self) -> bool {
        self.typing.is_active()
    }

    /// Append a typed user message without asking the backend.
    ///
    /// Ignored while awaiting a response or when the text is blank.
    pub async fn send(&self, text: &str) -> Option<Message> {
        let mut state = self.state.write().await;
        if !self.accepts_text(text) {
            return None;
        }
        Some(self.append(&mut state, Message::user(text)))
    }

    /// Append a typed user message and wait for the assistant's reply.
    ///
    /// Ignored while awaiting a response or when the text is blank.
    pub async fn submit(&self, text: &str) -> Option<Message> {
        let (message, guard, anchor) = {
            let mut state = self.state.write().await;
            if !self.accepts_text(text) {
                return None;
            }
            let message = self.append(&mut state, Message::user(text));
            let anchor = state.anchor(*message.id());
            (message, self.typing.begin(), anchor)
        };
        self.respond(text, Trigger::Send, guard, Some(anchor)).await;
        Some(message)
    }

    /// Append a picked suggestion and wait for the assistant's reply.
    ///
    /// Suggestions are only offered while the conversation holds just the
    /// greetings; later picks are ignored. They are not subject to the
    /// awaiting guard.
    pub async fn send_suggestion(&self, text: &str) -> Option<Message> {
        let (message, guard, anchor) = {
            let mut state = self.state.write().await;
            if !state.conversation.suggestions_visible() {
                debug!("Suggestion ignored after the conversation started");
                return None;
            }
            let message = self.append(&mut state, Message::user(text));
            let anchor = state.anchor(*message.id());
            (message, self.typing.begin(), anchor)
        };
        self.respond(text, Trigger::Suggestion, guard, Some(anchor)).await;
        Some(message)
    }

    /// Ask the backend about `prompt` and append its answer.
    ///
    /// Backend failures become an assistant error message; they never
    /// reach the caller.
    pub async fn request_response(&self, prompt: &str, trigger: Trigger) {
        let guard = self.typing.begin();
        let anchor = self.state.read().await.anchor_last();
        self.respond(prompt, trigger, guard, anchor).await;
    }

    /// Append a media attachment and schedule the canned acknowledgement.
    pub async fn attach(&self, attachment: Attachment) -> (Message, FollowUp) {
        let source = attachment.source;
        let mut state = self.state.write().await;
        let message = self.append(&mut state, Message::user_attachment(attachment));
        info!(message_id = %message.id(), ?source, "Attachment added");
        let anchor = state.anchor(*message.id());
        let follow_up = self.schedule_follow_up(replies::attachment_ack(source), Some(anchor));
        (message, follow_up)
    }

    /// Replace the text of `id`, drop everything after it, and ask again.
    ///
    /// Returns false, changing nothing, for an unknown id or blank text.
    pub async fn edit(&self, id: &MessageId, new_text: &str) -> bool {
        let (guard, anchor) = {
            let mut state = self.state.write().await;
            let Some(edited) = state.conversation.truncate_for_edit(id, new_text) else {
                debug!(message_id = %id, "Edit ignored");
                return false;
            };
            *state.revisions.entry(*edited.id()).or_insert(0) += 1;
            let len = state.conversation.len();
            info!(message_id = %edited.id(), len, "Message edited");
            self.events
                .send(StoreEvent::ConversationTruncated { len })
                .ok();
            state.forget_removed();
            (self.typing.begin(), state.anchor(*edited.id()))
        };
        self.respond(new_text, Trigger::Edit, guard, Some(anchor)).await;
        true
    }

    /// Drop `id` and everything after it.
    ///
    /// When trailing messages were discarded, the assistant acknowledges
    /// the deletion after the follow-up delay. Returns None for unknown ids.
    pub async fn delete(&self, id: &MessageId) -> Option<Deletion> {
        let mut state = self.state.write().await;
        let Some(outcome) = state.conversation.truncate_for_delete(id) else {
            debug!(message_id = %id, "Delete ignored");
            return None;
        };
        state.forget_removed();
        let len = state.conversation.len();
        info!(
            message_id = %id,
            removed = outcome.removed,
            len,
            "Message deleted"
        );
        self.events
            .send(StoreEvent::ConversationTruncated { len })
            .ok();

        // The follow-up answers whatever now ends the conversation.
        let follow_up = outcome
            .discarded_trailing()
            .then(|| self.schedule_follow_up(replies::DELETED_FOLLOW_UP, state.anchor_last()));

        Some(Deletion { outcome, follow_up })
    }

    /// Toggle a like/dislike on an assistant message.
    pub async fn react(&self, id: &MessageId, kind: ReactionKind) -> Option<Reactions> {
        let reactions = self.state.write().await.conversation.react(id, kind);
        match &reactions {
            Some(r) => debug!(
                message_id = %id,
                likes = r.likes,
                dislikes = r.dislikes,
                "Reaction toggled"
            ),
            None => debug!(message_id = %id, "Reaction ignored"),
        }
        reactions
    }

    fn accepts_text(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        if self.typing.is_active() {
            debug!("Send rejected while awaiting a response");
            return false;
        }
        true
    }

    async fn respond(
        &self,
        prompt: &str,
        trigger: Trigger,
        guard: PendingGuard,
        anchor: Option<Anchor>,
    ) {
        let reply = match self.backend.search(prompt).await {
            Ok(SearchReply::Markets(markets)) => {
                info!(markets = markets.len(), "Search returned market results");
                Message::assistant_markets(replies::MARKETS_INTRO, markets)
            }
            Ok(SearchReply::Text(text)) => Message::assistant(text),
            Err(e) => {
                warn!(error = %e, ?trigger, "Search failed");
                if trigger == Trigger::Send {
                    self.events
                        .send(StoreEvent::Alert {
                            title: replies::ALERT_TITLE.to_string(),
                            body: replies::ALERT_BODY.to_string(),
                        })
                        .ok();
                }
                Message::assistant(trigger.failure_text())
            }
        };
        self.append_if_current(reply, anchor).await;
        drop(guard);
    }

    fn schedule_follow_up(&self, text: &'static str, anchor: Option<Anchor>) -> FollowUp {
        let guard = self.typing.begin();
        let store = self.clone();
        let delay = self.config.follow_up_delay;
        FollowUp(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.append_if_current(Message::assistant(text), anchor).await;
            drop(guard);
        }))
    }

    async fn append_if_current(&self, message: Message, anchor: Option<Anchor>) -> bool {
        let mut state = self.state.write().await;
        if !state.is_current(anchor) {
            debug!(
                message_id = %message.id(),
                "Dropping reply to a deleted or edited message"
            );
            return false;
        }
        self.append(&mut state, message);
        true
    }

    fn append(&self, state: &mut State, message: Message) -> Message {
        state.conversation.push(message.clone());
        self.events
            .send(StoreEvent::MessageAppended(message.clone()))
            .ok();
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use cartchat_client::ClientError;
    use cartchat_core::{Categories, Category, MarketResult, MessageBody};
    use tokio::sync::Notify;

    /// Answers from a script, optionally holding each answer until released.
    struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<SearchReply, ClientError>>>,
        queries: Mutex<Vec<String>>,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<SearchReply, ClientError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                queries: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn gated(replies: Vec<Result<SearchReply, ClientError>>, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(replies)
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchBackend for ScriptedBackend {
        async fn search(&self, query: &str) -> Result<SearchReply, ClientError> {
            self.queries.lock().unwrap().push(query.to_string());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(SearchReply::Text("ok".to_string())))
        }
    }

    fn text(s: &str) -> Result<SearchReply, ClientError> {
        Ok(SearchReply::Text(s.to_string()))
    }

    fn markets() -> Result<SearchReply, ClientError> {
        Ok(SearchReply::Markets(vec![MarketResult {
            market_name: "Mercado do Inteli".to_string(),
            categories: Categories::new(vec![Category {
                name: "leite".to_string(),
                products: Vec::new(),
            }]),
        }]))
    }

    fn store_with(
        backend: Arc<ScriptedBackend>,
    ) -> (ConversationStore, mpsc::UnboundedReceiver<StoreEvent>) {
        ConversationStore::new(backend, StoreConfig::default())
    }

    async fn wait_until_awaiting(store: &ConversationStore) {
        for _ in 0..100 {
            if store.is_awaiting() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("store never started awaiting");
    }

    async fn wait_for_queries(backend: &ScriptedBackend, count: usize) {
        for _ in 0..100 {
            if backend.queries().len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("backend never saw {count} queries");
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<StoreEvent>) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_structured_reply_appends_market_message() {
        let backend = Arc::new(ScriptedBackend::new(vec![markets()]));
        let (store, _rx) = store_with(backend.clone());

        store.submit("leite").await.unwrap();

        let messages = store.snapshot().await;
        assert_eq!(messages.len(), 4);
        let reply = &messages[3];
        assert!(reply.is_assistant());
        assert_eq!(reply.text(), replies::MARKETS_INTRO);
        assert_eq!(reply.markets().unwrap().len(), 1);
        assert_eq!(reply.reactions(), Some(&Reactions::new()));
        assert_eq!(backend.queries(), vec!["leite"]);
        assert!(!store.is_awaiting());
    }

    #[tokio::test]
    async fn test_text_reply_appends_text_message() {
        let backend = Arc::new(ScriptedBackend::new(vec![text("Qual marca?")]));
        let (store, _rx) = store_with(backend);

        store.submit("café").await.unwrap();

        let last = store.message_at(3).await.unwrap();
        assert!(matches!(last.body(), MessageBody::Text { text } if text == "Qual marca?"));
    }

    #[tokio::test]
    async fn test_failure_becomes_message_and_alert() {
        let backend = Arc::new(ScriptedBackend::new(vec![Err(ClientError::Status {
            status: 500,
        })]));
        let (store, mut rx) = store_with(backend);

        store.submit("leite").await.unwrap();

        let last = store.message_at(3).await.unwrap();
        assert_eq!(last.text(), replies::SEND_FAILED);
        assert_eq!(last.reactions(), Some(&Reactions::new()));
        assert!(!store.is_awaiting());

        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, StoreEvent::Alert { title, .. } if title == replies::ALERT_TITLE)));
        assert_eq!(events.last(), Some(&StoreEvent::TypingChanged(false)));
    }

    #[tokio::test]
    async fn test_suggestion_failure_has_no_alert() {
        let backend = Arc::new(ScriptedBackend::new(vec![Err(
            ClientError::Serialization("bad".to_string()),
        )]));
        let (store, mut rx) = store_with(backend);
        assert!(store.suggestions_visible().await);

        store.send_suggestion("Procurar leite e pão").await.unwrap();

        assert!(!store.suggestions_visible().await);
        let last = store.message_at(3).await.unwrap();
        assert_eq!(last.text(), replies::SEARCH_FAILED);
        assert!(!drain(&mut rx)
            .iter()
            .any(|e| matches!(e, StoreEvent::Alert { .. })));
    }

    #[tokio::test]
    async fn test_suggestion_ignored_once_conversation_started() {
        let backend = Arc::new(ScriptedBackend::new(vec![text("r1")]));
        let (store, _rx) = store_with(backend.clone());
        store.submit("leite").await.unwrap();

        assert!(!store.suggestions_visible().await);
        assert!(store.send_suggestion("Procurar leite e pão").await.is_none());
        assert_eq!(store.len().await, 4);
        assert_eq!(backend.queries(), vec!["leite"]);
    }

    #[tokio::test]
    async fn test_send_rejected_while_awaiting() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(ScriptedBackend::gated(vec![text("ok")], gate.clone()));
        let (store, _rx) = store_with(backend);

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.submit("leite").await })
        };
        wait_until_awaiting(&store).await;

        assert!(store.send("pão").await.is_none());
        assert!(store.submit("pão").await.is_none());
        assert_eq!(store.len().await, 3);

        gate.notify_one();
        task.await.unwrap().unwrap();

        assert!(!store.is_awaiting());
        assert_eq!(store.len().await, 4);
        assert!(store.send("pão").await.is_some());
    }

    #[tokio::test]
    async fn test_blank_send_is_ignored() {
        let backend = Arc::new(ScriptedBackend::new(Vec::new()));
        let (store, _rx) = store_with(backend.clone());

        assert!(store.submit("   ").await.is_none());
        assert_eq!(store.len().await, 2);
        assert!(backend.queries().is_empty());
    }

    #[tokio::test]
    async fn test_edit_truncates_and_replays() {
        let backend = Arc::new(ScriptedBackend::new(vec![text("r1"), text("r2"), text("r3")]));
        let (store, mut rx) = store_with(backend.clone());
        store.submit("leite").await.unwrap();
        store.submit("ovos").await.unwrap();
        assert_eq!(store.len().await, 6);
        let target = store.message_at(2).await.unwrap();
        drain(&mut rx);

        assert!(store.edit(target.id(), "pão").await);

        let messages = store.snapshot().await;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].id(), target.id());
        assert_eq!(messages[2].text(), "pão");
        assert_eq!(messages[2].created_at(), target.created_at());
        assert_eq!(messages[3].text(), "r3");
        assert_eq!(backend.queries(), vec!["leite", "ovos", "pão"]);

        let events = drain(&mut rx);
        assert_eq!(events[0], StoreEvent::ConversationTruncated { len: 3 });
    }

    #[tokio::test]
    async fn test_edit_ignores_unknown_id_and_blank_text() {
        let backend = Arc::new(ScriptedBackend::new(Vec::new()));
        let (store, _rx) = store_with(backend.clone());
        let first = store.message_at(0).await.unwrap();

        assert!(!store.edit(&MessageId::generate(), "pão").await);
        assert!(!store.edit(first.id(), "  ").await);
        assert_eq!(store.len().await, 2);
        assert!(backend.queries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_with_tail_schedules_follow_up() {
        let backend = Arc::new(ScriptedBackend::new(vec![text("r1")]));
        let (store, _rx) = store_with(backend);
        store.submit("leite").await.unwrap();
        assert_eq!(store.len().await, 4);
        let target = store.message_at(1).await.unwrap();

        let started = tokio::time::Instant::now();
        let deletion = store.delete(target.id()).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(deletion.outcome.removed, 3);
        assert!(store.is_awaiting());

        deletion.follow_up.unwrap().wait().await;

        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(store.len().await, 2);
        let last = store.message_at(1).await.unwrap();
        assert_eq!(last.text(), replies::DELETED_FOLLOW_UP);
        assert_eq!(last.reactions(), Some(&Reactions::new()));
        assert!(!store.is_awaiting());
    }

    #[tokio::test]
    async fn test_delete_last_message_has_no_follow_up() {
        let backend = Arc::new(ScriptedBackend::new(Vec::new()));
        let (store, _rx) = store_with(backend);
        let last = store.message_at(1).await.unwrap();

        let deletion = store.delete(last.id()).await.unwrap();

        assert!(deletion.follow_up.is_none());
        assert_eq!(store.len().await, 1);
        assert!(!store.is_awaiting());
        assert!(store.delete(&MessageId::generate()).await.is_none());
    }

    #[tokio::test]
    async fn test_reply_to_deleted_prompt_is_dropped() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(ScriptedBackend::gated(vec![text("late")], gate.clone()));
        let (store, _rx) = store_with(backend);

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.submit("leite").await })
        };
        wait_until_awaiting(&store).await;

        let prompt = store.message_at(2).await.unwrap();
        let deletion = store.delete(prompt.id()).await.unwrap();
        assert!(deletion.follow_up.is_none());

        gate.notify_one();
        task.await.unwrap().unwrap();

        assert_eq!(store.len().await, 2);
        assert!(!store.is_awaiting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_survives_deleting_a_later_message() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(ScriptedBackend::gated(vec![text("resposta")], gate.clone()));
        let (store, _rx) = store_with(backend.clone());

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.submit("leite").await })
        };
        wait_for_queries(&backend, 1).await;

        let (photo, follow_up) = store.attach(Attachment::camera("file:///foto.jpg")).await;
        let deletion = store.delete(photo.id()).await.unwrap();
        assert!(deletion.follow_up.is_none());
        follow_up.wait().await;
        assert_eq!(store.len().await, 3);

        gate.notify_one();
        let prompt = task.await.unwrap().unwrap();

        let messages = store.snapshot().await;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].id(), prompt.id());
        assert_eq!(messages[3].text(), "resposta");
        assert!(!store.is_awaiting());
    }

    #[tokio::test]
    async fn test_reply_to_edited_prompt_is_replaced() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(ScriptedBackend::gated(
            vec![text("resposta"), text("resposta")],
            gate.clone(),
        ));
        let (store, _rx) = store_with(backend.clone());

        let submit = {
            let store = store.clone();
            tokio::spawn(async move { store.submit("leite").await })
        };
        wait_for_queries(&backend, 1).await;
        let prompt = store.message_at(2).await.unwrap();

        let edit = {
            let store = store.clone();
            let id = *prompt.id();
            tokio::spawn(async move { store.edit(&id, "pão").await })
        };
        wait_for_queries(&backend, 2).await;

        gate.notify_waiters();
        submit.await.unwrap().unwrap();
        assert!(edit.await.unwrap());

        let messages = store.snapshot().await;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].text(), "pão");
        assert_eq!(messages[3].text(), "resposta");
        assert_eq!(backend.queries(), vec!["leite", "pão"]);
        assert!(!store.is_awaiting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_follow_up_dropped_when_anchor_removed() {
        let backend = Arc::new(ScriptedBackend::new(vec![text("r1"), text("r2")]));
        let (store, _rx) = store_with(backend);
        store.submit("leite").await.unwrap();
        store.submit("ovos").await.unwrap();
        let ovos = store.message_at(4).await.unwrap();
        let r1 = store.message_at(3).await.unwrap();

        let deletion = store.delete(ovos.id()).await.unwrap();
        assert_eq!(deletion.outcome.removed, 2);
        assert!(store.delete(r1.id()).await.unwrap().follow_up.is_none());
        deletion.follow_up.unwrap().wait().await;

        assert_eq!(store.len().await, 3);
        assert_eq!(store.message_at(2).await.unwrap().text(), "leite");
        assert!(!store.is_awaiting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_attachments_are_acknowledged() {
        let backend = Arc::new(ScriptedBackend::new(Vec::new()));
        let (store, _rx) = store_with(backend.clone());

        let (photo, follow_up) = store.attach(Attachment::camera("file:///foto.jpg")).await;
        assert!(matches!(photo.body(), MessageBody::Image { .. }));
        assert!(store.is_awaiting());
        follow_up.wait().await;

        let (_, follow_up) = store.attach(Attachment::voice("file:///nota.m4a")).await;
        follow_up.wait().await;

        let texts: Vec<String> = store
            .snapshot()
            .await
            .iter()
            .skip(2)
            .map(|m| m.text().to_string())
            .collect();
        assert_eq!(
            texts,
            vec![
                "",
                "Ótima foto! Como posso ajudar?",
                "",
                "Recebi sua mensagem de voz. Como posso ajudar?",
            ]
        );
        assert!(backend.queries().is_empty());
        assert!(!store.is_awaiting());
    }

    #[tokio::test]
    async fn test_react_toggles_counters() {
        let backend = Arc::new(ScriptedBackend::new(Vec::new()));
        let (store, _rx) = store_with(backend);
        let greeting = store.message_at(0).await.unwrap();

        let r = store.react(greeting.id(), ReactionKind::Like).await.unwrap();
        assert_eq!((r.likes, r.dislikes, r.user_reaction), (1, 0, Some(ReactionKind::Like)));

        let r = store.react(greeting.id(), ReactionKind::Dislike).await.unwrap();
        assert_eq!((r.likes, r.dislikes, r.user_reaction), (0, 1, Some(ReactionKind::Dislike)));

        let r = store.react(greeting.id(), ReactionKind::Dislike).await.unwrap();
        assert_eq!((r.likes, r.dislikes, r.user_reaction), (0, 0, None));
    }

    #[tokio::test]
    async fn test_react_on_user_message_is_noop() {
        let backend = Arc::new(ScriptedBackend::new(Vec::new()));
        let (store, _rx) = store_with(backend);
        let sent = store.send("leite").await.unwrap();

        assert!(store.react(sent.id(), ReactionKind::Like).await.is_none());
        assert!(store
            .react(&MessageId::generate(), ReactionKind::Like)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_request_response_closes_typing_flag() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            text("ok"),
            Err(ClientError::Connection("refused".to_string())),
        ]));
        let (store, _rx) = store_with(backend);

        store.request_response("leite", Trigger::Send).await;
        assert!(!store.is_awaiting());
        store.request_response("leite", Trigger::Edit).await;
        assert!(!store.is_awaiting());
        assert_eq!(store.message_at(3).await.unwrap().text(), replies::SEARCH_FAILED);
    }
}
