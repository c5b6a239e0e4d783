//! Fixed assistant texts.

use cartchat_core::AttachmentSource;

/// Intro text shown above a market result list.
pub const MARKETS_INTRO: &str = "Aqui estão os produtos que encontrei para você:";

/// Failure reply for a typed message.
pub const SEND_FAILED: &str = "Desculpe, encontrei um erro ao buscar os produtos. Por favor, verifique sua conexão e tente novamente.";

/// Failure reply for suggestions and edits.
pub const SEARCH_FAILED: &str =
    "Desculpe, encontrei um erro ao buscar os produtos. Por favor, tente novamente.";

pub const ALERT_TITLE: &str = "Erro";

pub const ALERT_BODY: &str = "Erro ao processar sua solicitação. Por favor, tente novamente.";

/// Follow-up after the user deleted part of the conversation.
pub const DELETED_FOLLOW_UP: &str = "Notei que você deletou uma mensagem. Como posso ajudar?";

/// Acknowledgement for a media attachment.
pub fn attachment_ack(source: AttachmentSource) -> &'static str {
    match source {
        AttachmentSource::Gallery => "Boa foto! Como posso ajudar?",
        AttachmentSource::Camera => "Ótima foto! Como posso ajudar?",
        AttachmentSource::VoiceRecorder => "Recebi sua mensagem de voz. Como posso ajudar?",
    }
}
