//! Key dispatch and network round-trips around the [`Directory`] state.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use uuid::Uuid;

use crate::{
  client::ApiClient,
  form::Field,
  state::{Directory, SaveRequest, Surface},
};

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// People and the open surface.
  pub directory: Directory,

  /// Cursor position within the display-ordered list.
  pub list_cursor: usize,

  /// Scroll offset within the detail pane.
  pub detail_scroll: u16,

  /// One-line status message shown in the status bar. Cleared by the next
  /// key press.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      directory: Directory::default(),
      list_cursor: 0,
      detail_scroll: 0,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch everyone from the API.
  pub async fn load_people(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading people…".into();
    match self.client.list_people().await {
      Ok(people) => {
        tracing::debug!(count = people.len(), "people loaded");
        self.directory.reload(people);
        self.list_cursor = 0;
        self.status_msg = String::new();
        Ok(())
      }
      Err(e) => {
        tracing::error!(error = %e, "loading people failed");
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  /// The id under the list cursor, if any.
  pub fn cursor_id(&self) -> Option<Uuid> {
    self.directory.display_order().get(self.list_cursor).map(|p| p.id)
  }

  fn clamp_cursor(&mut self) {
    let len = self.directory.people().len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
  }

  fn report<E: std::fmt::Display>(&mut self, result: Result<(), E>) {
    if let Err(e) = result {
      self.status_msg = e.to_string();
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }
    self.status_msg.clear();

    match self.directory.surface() {
      Surface::Closed => return self.handle_list_key(key).await,
      Surface::Viewing(_) => return self.handle_detail_key(key).await,
      Surface::Adding(_) | Surface::Editing { .. } => self.handle_form_key(key).await,
      Surface::Confirming { .. } => self.handle_confirm_key(key).await,
    }
    Ok(true)
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        if self.list_cursor + 1 < self.directory.people().len() {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_id() {
          self.detail_scroll = 0;
          let result = self.directory.open_detail(id);
          self.report(result);
        }
      }

      KeyCode::Char('a') => {
        let result = self.directory.open_add();
        self.report(result);
      }

      KeyCode::Char('r') => {
        // Failure is already shown in the status bar.
        let _ = self.load_people().await;
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        let result = self.directory.cancel();
        self.report(result);
      }

      KeyCode::Char('e') => {
        let result = self.directory.edit();
        self.report(result);
      }
      KeyCode::Char('d') => {
        let result = self.directory.request_delete();
        self.report(result);
      }

      KeyCode::Down | KeyCode::Char('j') => {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
      }

      // Step through the list without leaving the detail view.
      KeyCode::Char(']') | KeyCode::PageDown => {
        if self.list_cursor + 1 < self.directory.people().len() {
          self.list_cursor += 1;
          self.reopen_at_cursor();
        }
      }
      KeyCode::Char('[') | KeyCode::PageUp => {
        if self.list_cursor > 0 {
          self.list_cursor -= 1;
          self.reopen_at_cursor();
        }
      }

      _ => {}
    }
    Ok(true)
  }

  fn reopen_at_cursor(&mut self) {
    if let Some(id) = self.cursor_id() {
      self.detail_scroll = 0;
      let result = self.directory.open_detail(id);
      self.report(result);
    }
  }

  async fn handle_form_key(&mut self, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Char('s') if ctrl => self.save().await,
      KeyCode::Char('d') if ctrl => {
        let result = self.directory.request_delete();
        self.report(result);
      }
      KeyCode::Esc => {
        let result = self.directory.cancel();
        self.report(result);
      }
      _ => {
        if self.directory.is_saving() {
          return;
        }
        let Some(form) = self.directory.form_mut() else { return };
        match key.code {
          KeyCode::Tab | KeyCode::Down => form.focus_next(),
          KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
          KeyCode::Left => form.cycle(false),
          KeyCode::Right => form.cycle(true),
          KeyCode::Enter if form.focused() == Field::Hobbies => {
            form.add_hobby();
          }
          KeyCode::Enter => form.focus_next(),
          KeyCode::Backspace => form.backspace(),
          KeyCode::Char(c) if !ctrl => form.input_char(c),
          _ => {}
        }
      }
    }
  }

  async fn handle_confirm_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('y') | KeyCode::Enter => self.delete().await,
      KeyCode::Char('n') | KeyCode::Esc => {
        let result = self.directory.cancel();
        self.report(result);
      }
      _ => {}
    }
  }

  // ── Round-trips ───────────────────────────────────────────────────────────

  async fn save(&mut self) {
    if !self.directory.is_saving()
      && let Some(form) = self.directory.form_mut()
      && let Err(e) = form.embed_image()
    {
      tracing::warn!(error = %e, "reading image file failed");
      self.status_msg = format!("Image: {e}");
      return;
    }

    let request = match self.directory.begin_save() {
      Ok(request) => request,
      Err(e) => {
        self.status_msg = e.to_string();
        return;
      }
    };

    self.status_msg = "Saving…".into();
    let result = match &request {
      SaveRequest::Create(draft) => self.client.create_person(draft).await,
      SaveRequest::Update(id, patch) => self.client.update_person(*id, patch).await,
    };

    match result {
      Ok(person) => {
        tracing::info!(id = %person.id, "person saved");
        self.status_msg = format!("Saved {}", person.profile.name);
        self.directory.save_succeeded(person);
      }
      Err(e) => {
        tracing::error!(error = %e, "saving person failed");
        self.status_msg = format!("Error: {e}");
        self.directory.save_failed();
      }
    }
  }

  async fn delete(&mut self) {
    let id = match self.directory.begin_delete() {
      Ok(id) => id,
      Err(e) => {
        self.status_msg = e.to_string();
        return;
      }
    };

    self.status_msg = "Deleting…".into();
    match self.client.delete_person(id).await {
      Ok(()) => {
        tracing::info!(%id, "person deleted");
        self.status_msg = "Deleted".into();
        self.directory.delete_succeeded(id);
        self.clamp_cursor();
      }
      Err(e) => {
        tracing::error!(%id, error = %e, "deleting person failed");
        self.status_msg = format!("Error: {e}");
        self.directory.delete_failed();
      }
    }
  }
}
