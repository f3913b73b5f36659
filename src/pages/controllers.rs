//! Generic page controllers, instantiated once per [`PageResource`].
//!
//! Every controller is stateless per request: view, optionally mutate,
//! then render or redirect. Redirects are `303 See Other` to a location
//! computed from the route table. Failures render an HTML error page with
//! the status mapped from [`BlogError`].

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Serialize;

use super::form::{BoundForm, RawForm, load_choices, raw_from_values};
use super::renderer::{CONFIRM_DELETE_TEMPLATE, FORM_TEMPLATE, respond};
use super::resources::PageResource;
use crate::app_state::AppState;
use crate::domain::validation::{Source, clean_form};
use crate::error::{BlogError, FieldErrors};

/// Submitted form as extracted by the handlers.
pub type FormBody = Result<Form<RawForm>, FormRejection>;

#[derive(Debug, Serialize)]
struct FormPage {
    entity: &'static str,
    form: BoundForm,
    action: String,
    cancel_url: String,
}

#[derive(Debug, Serialize)]
struct DeletePage {
    entity: &'static str,
    name: String,
    warning: Option<String>,
    action: String,
    cancel_url: String,
}

/// Where a rendered form posts to and what it is called.
#[derive(Debug)]
struct FormTarget {
    title: String,
    action: String,
    cancel_url: String,
}

impl FormTarget {
    fn create<R: PageResource>() -> Self {
        Self {
            title: format!("New {}", R::SCHEMA.kind.title()),
            action: R::CREATE.path().to_string(),
            cancel_url: R::LIST.path().to_string(),
        }
    }

    fn edit<R: PageResource>(record: &R) -> Self {
        Self {
            title: format!("Edit {}", R::SCHEMA.kind.title()),
            action: R::UPDATE.path_for(record.id()),
            cancel_url: R::DETAIL.path_for(record.id()),
        }
    }
}

/// `GET` list page.
pub async fn list<R: PageResource>(State(state): State<AppState>) -> Response {
    respond(&state.pages, render_list::<R>(&state).await)
}

/// `GET` detail page.
pub async fn detail<R: PageResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    respond(&state.pages, render_detail::<R>(&state, &id).await)
}

/// `GET` empty create form.
pub async fn create_form<R: PageResource>(State(state): State<AppState>) -> Response {
    let result = render_form::<R>(
        &state,
        FormTarget::create::<R>(),
        &RawForm::new(),
        &FieldErrors::new(),
    )
    .await;
    respond(&state.pages, result)
}

/// `POST` create form; redirects to the list page on success.
pub async fn create_submit<R: PageResource>(
    State(state): State<AppState>,
    form: FormBody,
) -> Response {
    respond(&state.pages, submit_create::<R>(&state, form).await)
}

/// `GET` edit form pre-filled with the stored record.
pub async fn edit_form<R: PageResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    respond(&state.pages, render_edit::<R>(&state, &id).await)
}

/// `POST` edit form; redirects to the record's detail page on success.
pub async fn edit_submit<R: PageResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: FormBody,
) -> Response {
    respond(&state.pages, submit_edit::<R>(&state, &id, form).await)
}

/// `GET` delete confirmation page.
pub async fn confirm_delete<R: PageResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    respond(&state.pages, render_confirm_delete::<R>(&state, &id).await)
}

/// `POST` delete confirmation; redirects to the list page on success.
pub async fn delete_submit<R: PageResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    respond(&state.pages, submit_delete::<R>(&state, &id).await)
}

async fn render_list<R: PageResource>(state: &AppState) -> Result<Html<String>, BlogError> {
    let records = state.service.list::<R>(R::LIST_ORDER).await?;
    let page = R::list_page(&state.service, records).await?;
    state.pages.render(R::LIST_TEMPLATE, R::LIST_TITLE, &page)
}

async fn render_detail<R: PageResource>(
    state: &AppState,
    raw_id: &str,
) -> Result<Html<String>, BlogError> {
    let record = state.service.get::<R>(R::parse_id(raw_id)?).await?;
    let title = record.display_name();
    let page = R::detail_page(&state.service, record).await?;
    state.pages.render(R::DETAIL_TEMPLATE, &title, &page)
}

async fn render_form<R: PageResource>(
    state: &AppState,
    target: FormTarget,
    raw: &RawForm,
    errors: &FieldErrors,
) -> Result<Html<String>, BlogError> {
    let choices = load_choices(&state.service, R::SCHEMA).await?;
    let page = FormPage {
        entity: R::SCHEMA.kind.title(),
        form: BoundForm::bind(R::SCHEMA, raw, errors, &choices),
        action: target.action,
        cancel_url: target.cancel_url,
    };
    state.pages.render(FORM_TEMPLATE, &target.title, &page)
}

async fn render_edit<R: PageResource>(
    state: &AppState,
    raw_id: &str,
) -> Result<Html<String>, BlogError> {
    let record = state.service.get::<R>(R::parse_id(raw_id)?).await?;
    let raw = raw_from_values(&record.values());
    render_form::<R>(state, FormTarget::edit(&record), &raw, &FieldErrors::new()).await
}

fn read_form(form: FormBody) -> Result<RawForm, BlogError> {
    form.map(|Form(raw)| raw)
        .map_err(|rejection| BlogError::MalformedBody(rejection.body_text()))
}

async fn submit_create<R: PageResource>(
    state: &AppState,
    form: FormBody,
) -> Result<Response, BlogError> {
    let raw = read_form(form)?;
    let saved = match clean_form(R::SCHEMA, &raw) {
        Ok(values) => state.service.create::<R>(values, Source::Form).await,
        Err(errors) => Err(BlogError::Validation(errors)),
    };
    match saved {
        Ok(_) => Ok(Redirect::to(R::LIST.path()).into_response()),
        Err(BlogError::Validation(errors)) => {
            tracing::debug!(entity = %R::SCHEMA.kind, ?errors, "create form rejected");
            let html = render_form::<R>(state, FormTarget::create::<R>(), &raw, &errors).await?;
            Ok(html.into_response())
        }
        Err(err) => Err(err),
    }
}

async fn submit_edit<R: PageResource>(
    state: &AppState,
    raw_id: &str,
    form: FormBody,
) -> Result<Response, BlogError> {
    let current = state.service.get::<R>(R::parse_id(raw_id)?).await?;
    let raw = read_form(form)?;
    let saved = match clean_form(R::SCHEMA, &raw) {
        Ok(values) => {
            state
                .service
                .update::<R>(current.id(), values, Source::Form)
                .await
        }
        Err(errors) => Err(BlogError::Validation(errors)),
    };
    match saved {
        Ok(record) => Ok(Redirect::to(&R::DETAIL.path_for(record.id())).into_response()),
        Err(BlogError::Validation(errors)) => {
            tracing::debug!(entity = %R::SCHEMA.kind, ?errors, "edit form rejected");
            let html = render_form::<R>(state, FormTarget::edit(&current), &raw, &errors).await?;
            Ok(html.into_response())
        }
        Err(err) => Err(err),
    }
}

async fn render_confirm_delete<R: PageResource>(
    state: &AppState,
    raw_id: &str,
) -> Result<Html<String>, BlogError> {
    let record = state.service.get::<R>(R::parse_id(raw_id)?).await?;
    let page = DeletePage {
        entity: R::SCHEMA.kind.name(),
        name: record.display_name(),
        warning: R::delete_warning(&state.service, &record).await?,
        action: R::DELETE.path_for(record.id()),
        cancel_url: R::DETAIL.path_for(record.id()),
    };
    let title = format!("Delete {}", R::SCHEMA.kind.title());
    state.pages.render(CONFIRM_DELETE_TEMPLATE, &title, &page)
}

async fn submit_delete<R: PageResource>(
    state: &AppState,
    raw_id: &str,
) -> Result<Redirect, BlogError> {
    state.service.delete::<R>(R::parse_id(raw_id)?).await?;
    Ok(Redirect::to(R::LIST.path()))
}
