// src/infrastructure/notes_api.rs
use crate::application::NoteRepository;
use crate::constants::NOTES_RESOURCE;
use crate::domain::{ListParams, Note, NoteDraft, NotesPage, RequestError};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Typed HTTP client for the notes service.
///
/// Stateless apart from the connection pool; one attempt per call, no
/// timeouts and no retries.
#[derive(Debug, Clone)]
pub struct NotesApi {
    base_url: Url,
    client: reqwest::Client,
}

/// List responses come either as a bare array or wrapped in an object
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody {
    Bare(Vec<Note>),
    Wrapped {
        #[serde(alias = "items", alias = "data")]
        notes: Vec<Note>,
    },
}

impl ListBody {
    fn into_notes(self) -> Vec<Note> {
        match self {
            ListBody::Bare(notes) | ListBody::Wrapped { notes } => notes,
        }
    }
}

impl NotesApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("Invalid notes service URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            bail!("Notes service URL cannot carry a path: {base_url}");
        }

        debug!(%base_url, "Creating notes API client");
        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/notes[/{id}]`, with `id` percent-encoded as one path segment
    fn endpoint(&self, id: Option<&str>) -> Result<Url, RequestError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                RequestError::Transport(format!("cannot extend URL {}", self.base_url))
            })?;
            segments.pop_if_empty().push(NOTES_RESOURCE);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RequestError> {
        let response = request
            .send()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, RequestError> {
        let body = response
            .bytes()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| RequestError::Decode(e.to_string()))
    }
}

#[async_trait]
impl NoteRepository for NotesApi {
    #[instrument(level = "debug", skip(self))]
    async fn get_notes(&self, params: &ListParams) -> Result<NotesPage, RequestError> {
        let request = self
            .client
            .get(self.endpoint(None)?)
            .query(&params.query_pairs());

        let result = async {
            let response = self.send(request).await?;
            Self::read_json::<ListBody>(response).await
        }
        .await;

        let notes = result
            .inspect_err(|e| warn!(%e, "Error fetching notes"))?
            .into_notes();
        debug!(count = notes.len(), page = params.page, "Fetched notes");
        Ok(NotesPage::from_items(notes, params.page, params.limit))
    }

    #[instrument(level = "debug", skip(self))]
    async fn create_note(&self, draft: &NoteDraft) -> Result<Note, RequestError> {
        let request = self.client.post(self.endpoint(None)?).json(draft);

        let result = async {
            let response = self.send(request).await?;
            Self::read_json::<Note>(response).await
        }
        .await;

        result.inspect_err(|e| warn!(%e, "Error creating note"))
    }

    #[instrument(level = "debug", skip(self))]
    async fn update_note(&self, id: &str, draft: &NoteDraft) -> Result<Note, RequestError> {
        let request = self.client.put(self.endpoint(Some(id))?).json(draft);

        let result = async {
            let response = self.send(request).await?;
            Self::read_json::<Note>(response).await
        }
        .await;

        result.inspect_err(|e| warn!(%e, id, "Error updating note"))
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_note(&self, id: &str) -> Result<bool, RequestError> {
        let request = self.client.delete(self.endpoint(Some(id))?);

        self.send(request)
            .await
            .inspect_err(|e| warn!(%e, id, "Error deleting note"))?;
        Ok(true)
    }
}
