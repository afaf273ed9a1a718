//! Offline description of a callback link.
//!
//! Reports where credentials sit and what hints ride along; token values
//! never appear in the report.

#[cfg(test)]
#[path = "inspect_test.rs"]
mod inspect_test;

use linkback::CallbackLink;
use linkback::link::{LinkParams, TokenSource};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LinkFailureReport {
    pub code: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LinkReport {
    pub path: String,
    /// Half of the link the flow would take tokens from.
    pub token_source: Option<TokenSource>,
    pub link_type: Option<String>,
    pub has_access_token: bool,
    pub has_refresh_token: bool,
    /// Whether the manual signup path alone would find credentials.
    pub signup_tokens: bool,
    pub failure: Option<LinkFailureReport>,
    pub name_hint: Option<String>,
    pub email_hint: Option<String>,
}

impl LinkReport {
    pub fn from_link(link: &CallbackLink) -> Self {
        let signup = link.signup_tokens();
        let located = match &signup {
            Some((pair, source)) => Some((pair.clone(), *source)),
            None => link
                .fragment()
                .tokens()
                .map(|pair| (pair, TokenSource::Fragment))
                .or_else(|| link.query().tokens().map(|pair| (pair, TokenSource::Query))),
        };
        let hint = link.profile_hint();

        Self {
            path: link.path().to_owned(),
            token_source: located.as_ref().map(|(_, source)| *source),
            link_type: located
                .as_ref()
                .map(|(pair, _)| pair.link_type().to_owned())
                .filter(|t| !t.is_empty()),
            has_access_token: carries(link, "access_token"),
            has_refresh_token: carries(link, "refresh_token"),
            signup_tokens: signup.is_some(),
            failure: link
                .failure()
                .map(|f| LinkFailureReport { code: f.code, message: f.message }),
            name_hint: hint.display_name().map(str::to_owned),
            email_hint: hint.email,
        }
    }
}

fn carries(link: &CallbackLink, key: &str) -> bool {
    let present = |params: &LinkParams| params.get(key).is_some_and(|v| !v.is_empty());
    present(link.query()) || present(link.fragment())
}
