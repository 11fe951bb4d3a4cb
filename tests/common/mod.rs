//! In-memory stand-in for the `op` executable.
//!
//! Records sign-ins and commands, keeps created entities so lookups behave
//! like the real tool, and can be told to fail upcoming commands.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use op_binding::{Credentials, Error, OpExecutor, Result, Session};
use serde_json::{json, Value};

pub const SHORTHAND: &str = "shorthand";
pub const CREATED_AT: &str = "2020-12-29T10:53:35Z";

#[derive(Default)]
struct State {
    signins: Vec<Vec<String>>,
    commands: Vec<Vec<String>>,
    sessions: Vec<Option<String>>,
    failures: VecDeque<String>,
    expired_tokens: HashSet<String>,
    responses: Vec<(Vec<String>, String)>,
    entities: Vec<(String, Value)>,
    issued: usize,
    next_id: usize,
}

/// Fake executor; clones share the same state
#[derive(Clone, Default)]
pub struct FakeOp {
    state: Arc<Mutex<State>>,
}

impl FakeOp {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Fail the next command with the given stderr message
    pub fn fail_next(&self, message: &str) {
        self.state().failures.push_back(message.to_string());
    }

    /// Reject commands carrying this token as expired
    pub fn expire(&self, token: &str) {
        self.state().expired_tokens.insert(token.to_string());
    }

    /// Answer the exact argument list with canned stdout
    pub fn respond(&self, arguments: &[&str], stdout: &str) {
        self.state().responses.push((
            arguments.iter().map(|s| s.to_string()).collect(),
            stdout.to_string(),
        ));
    }

    /// Sign-ins since the last call, as [address, email, secret key]
    pub fn signins(&self) -> Vec<Vec<String>> {
        std::mem::take(&mut self.state().signins)
    }

    /// Successful commands since the last call
    pub fn commands(&self) -> Vec<Vec<String>> {
        std::mem::take(&mut self.state().commands)
    }

    /// Session tokens passed to each command attempt
    pub fn sessions(&self) -> Vec<Option<String>> {
        std::mem::take(&mut self.state().sessions)
    }

    fn handle(state: &mut State, args: &[String]) -> Result<String> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["list", plural, ..] => {
                let kind = plural.trim_end_matches('s');
                let items: Vec<Value> = state
                    .entities
                    .iter()
                    .filter(|(k, _)| k == kind)
                    .map(|(_, v)| v.clone())
                    .collect();
                Ok(Value::Array(items).to_string())
            }
            ["get", kind, key] => {
                let matches: Vec<&Value> = state
                    .entities
                    .iter()
                    .filter(|(k, v)| {
                        k == kind
                            && (v["uuid"] == *key || v["name"] == *key || v["email"] == *key)
                    })
                    .map(|(_, v)| v)
                    .collect();
                match matches.as_slice() {
                    [] => Err(Error::tool(
                        format!(
                            "[ERROR] 2021/01/05 10:11:12 \"{}\" doesn't seem to be a {} in this account.",
                            key, kind
                        ),
                        Some(1),
                    )),
                    [one] => Ok(one.to_string()),
                    _ => Err(Error::tool(
                        format!(
                            "[ERROR] 2021/01/05 10:11:12 More than one {} matches \"{}\". Try again and use the UUID instead.",
                            kind, key
                        ),
                        Some(1),
                    )),
                }
            }
            ["create", "user", email, name, rest @ ..] => {
                state.next_id += 1;
                let language = flag_value(rest, "language").unwrap_or("en");
                let user = json!({
                    "uuid": format!("U{}", state.next_id),
                    "email": email,
                    "name": name,
                    "firstName": name,
                    "lastName": "",
                    "language": language,
                    "createdAt": CREATED_AT,
                    "updatedAt": CREATED_AT,
                    "lastAuthAt": "0001-01-01T00:00:00Z",
                    "state": "3",
                    "type": "R",
                });
                state.entities.push(("user".to_string(), user.clone()));
                Ok(user.to_string())
            }
            ["create", kind, name, rest @ ..] => {
                state.next_id += 1;
                let mut entity = json!({
                    "uuid": format!("{}{}", kind[..1].to_uppercase(), state.next_id),
                    "name": name,
                    "desc": flag_value(rest, "description").unwrap_or(""),
                });
                if *kind == "group" {
                    entity["createdAt"] = json!(CREATED_AT);
                }
                state.entities.push((kind.to_string(), entity.clone()));
                Ok(entity.to_string())
            }
            ["edit", kind, id, rest @ ..] => {
                let entity = find_by_id(state, kind, id)?;
                if let Some(name) = flag_value(rest, "name") {
                    entity["name"] = json!(name);
                }
                if let Some(description) = flag_value(rest, "description") {
                    entity["desc"] = json!(description);
                }
                Ok(String::new())
            }
            ["delete", kind, id] => {
                find_by_id(state, kind, id)?;
                state
                    .entities
                    .retain(|(k, v)| !(k == kind && v["uuid"] == *id));
                Ok(String::new())
            }
            _ => Ok(String::new()),
        }
    }
}

fn flag_value<'a>(args: &[&'a str], flag: &str) -> Option<&'a str> {
    let prefix = format!("--{}=", flag);
    args.iter().find_map(|a| a.strip_prefix(prefix.as_str()))
}

fn find_by_id<'a>(state: &'a mut State, kind: &str, id: &str) -> Result<&'a mut Value> {
    state
        .entities
        .iter_mut()
        .find(|(k, v)| k == kind && v["uuid"] == *id)
        .map(|(_, v)| v)
        .ok_or_else(|| {
            Error::tool(
                format!("[ERROR] \"{}\" doesn't seem to be a {} in this account.", id, kind),
                Some(1),
            )
        })
}

impl OpExecutor for FakeOp {
    fn signin(
        &self,
        sign_in_address: &str,
        email_address: &str,
        secret_key: &str,
        password: &dyn Fn() -> String,
    ) -> Result<Session> {
        let password = password();
        let mut state = self.state();
        state.signins.push(vec![
            sign_in_address.to_string(),
            email_address.to_string(),
            secret_key.to_string(),
        ]);
        if password.is_empty() {
            return Err(Error::tool("[ERROR] 401: Authentication required.", Some(1)));
        }
        state.issued += 1;
        Ok(Session::new(format!("token-{}", state.issued), SHORTHAND))
    }

    fn signout(&self, _session: &Session) -> Result<()> {
        self.state().commands.push(vec!["signout".to_string()]);
        Ok(())
    }

    fn execute(&self, session: Option<&Session>, arguments: &[Option<String>]) -> Result<String> {
        let mut state = self.state();
        let token = session.map(|s| s.token().to_string());
        state.sessions.push(token.clone());

        if let Some(message) = state.failures.pop_front() {
            return Err(Error::tool(message, Some(1)));
        }

        match &token {
            None => {
                return Err(Error::tool(
                    "[ERROR] You are not currently signed in. Please run `op signin --help` for instructions",
                    Some(1),
                ))
            }
            Some(token) if state.expired_tokens.contains(token) => {
                return Err(Error::tool(
                    "[ERROR] Your session expired, sign in to create a new session",
                    Some(1),
                ))
            }
            Some(_) => {}
        }

        let args: Vec<String> = arguments.iter().flatten().cloned().collect();
        let canned = state
            .responses
            .iter()
            .find(|(expected, _)| *expected == args)
            .map(|(_, stdout)| stdout.clone());
        let result = match canned {
            Some(stdout) => Ok(stdout),
            None => Self::handle(&mut state, &args),
        };

        if result.is_ok() {
            state.commands.push(args);
        }
        result
    }

    fn version(&self) -> Result<String> {
        Ok("1.8.0".to_string())
    }
}

pub fn credentials() -> Credentials {
    Credentials::new("user", "email", "key", || "password".to_string())
}

pub fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
