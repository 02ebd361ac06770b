//! Permission Evaluator
//!
//! Decides whether the current caller may read or edit a node. The decision
//! is a pure function of the node, the action, the caller's session and the
//! reject-display setting.
//!
//! # Rules
//!
//! Checked in order; the first rule that applies decides.
//!
//! 1. No node (creating the root): allowed for tapestry editors.
//! 2. Draft, caller is the author: edit is allowed; read is allowed unless
//!    the draft is submitted for review.
//! 3. Draft, caller is a tapestry editor (reviewer): only read, and only for
//!    submitted drafts or, when enabled, rejected ones.
//! 4. Any other draft access is denied.
//! 5. Tapestry editors may do anything on published nodes.
//! 6. Authors keep access to their own nodes until a review accepts them.
//! 7. Administrator, editor and author roles may do anything.
//! 8. The node's `public` list.
//! 9. The node's `authenticated` list, for logged-in callers.
//! 10. The node's per-role lists.
//! 11. The node's `user-<id>` list.

use serde::{Deserialize, Serialize};

use crate::graph::{Action, Node, Permissions, ReviewStatus, UserId};

/// Roles with blanket access to published nodes.
pub const PRIVILEGED_ROLES: [&str; 3] = ["administrator", "editor", "author"];

/// Identity and capabilities of the current caller, as provided by the host.
pub trait Session: Send + Sync {
    /// Id of the logged-in user, if any.
    fn user_id(&self) -> Option<UserId>;

    /// Roles held by the current user.
    fn roles(&self) -> &[String];

    fn is_logged_in(&self) -> bool;

    /// Whether the caller may edit the tapestry as a whole.
    fn can_edit_tapestry(&self) -> bool;

    fn is_current_user(&self, id: UserId) -> bool {
        self.user_id() == Some(id)
    }
}

/// A plain session value, usually deserialized from the host page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default)]
    pub can_edit_tapestry: bool,
}

impl Caller {
    /// A visitor who is not logged in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A logged-in user without any roles.
    pub fn user(id: UserId) -> Self {
        Self {
            id: Some(id),
            logged_in: true,
            ..Self::default()
        }
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Grant tapestry-wide edit rights.
    pub fn tapestry_editor(mut self) -> Self {
        self.can_edit_tapestry = true;
        self
    }
}

impl Session for Caller {
    fn user_id(&self) -> Option<UserId> {
        self.id
    }

    fn roles(&self) -> &[String] {
        &self.roles
    }

    fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    fn can_edit_tapestry(&self) -> bool {
        self.can_edit_tapestry
    }
}

/// Whether `session` may perform `action` on `node`.
///
/// `node` is `None` only when the root node is being created.
pub fn has_permission(
    node: Option<&Node>,
    action: Action,
    show_rejected: bool,
    session: &dyn Session,
) -> bool {
    let Some(node) = node else {
        return session.can_edit_tapestry();
    };

    let is_author = node
        .author
        .as_ref()
        .is_some_and(|author| session.is_current_user(author.id));

    if node.is_draft() {
        return draft_permission(node, action, show_rejected, is_author, session);
    }

    if session.can_edit_tapestry() {
        return true;
    }

    if is_author && node.review_status != Some(ReviewStatus::Accept) {
        return true;
    }

    let roles = session.roles();
    if roles.iter().any(|role| PRIVILEGED_ROLES.contains(&role.as_str())) {
        return true;
    }

    let permissions = &node.permissions;
    if permissions.allows(Permissions::PUBLIC, action) {
        return true;
    }

    if session.is_logged_in() && permissions.allows(Permissions::AUTHENTICATED, action) {
        return true;
    }

    if roles.iter().any(|role| permissions.allows(role, action)) {
        return true;
    }

    session
        .user_id()
        .is_some_and(|id| permissions.allows(&Permissions::user_key(id), action))
}

fn draft_permission(
    node: &Node,
    action: Action,
    show_rejected: bool,
    is_author: bool,
    session: &dyn Session,
) -> bool {
    let submitted = node.review_status == Some(ReviewStatus::Submit);

    if is_author {
        // Submitting hands the draft over to reviewers until it is resolved.
        return action != Action::Read || !submitted;
    }

    if session.can_edit_tapestry() {
        return action == Action::Read
            && (submitted || (show_rejected && node.review_status == Some(ReviewStatus::Reject)));
    }

    false
}
