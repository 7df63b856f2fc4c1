use std::io::Write;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use crate::permission::*;
use crate::resource::{Alert, HelpRequest, HelpResponse, OwnerRef, ResourceKind, ResponseStatus};
use crate::role::Role;
use crate::user::User;

fn alert(owner: &str) -> Alert {
	Alert {
		id: "a1".to_string(),
		user_id: owner.to_string(),
		title: "Pothole on Calea Victoriei".to_string(),
		category: "Road".to_string(),
		priority: "Medium".to_string(),
	}
}

fn request(owner: &str) -> HelpRequest {
	HelpRequest {
		id: "r1".to_string(),
		user_id: owner.to_string(),
		title: "Leaking tap".to_string(),
		..Default::default()
	}
}

fn response(responder: &str) -> HelpResponse {
	HelpResponse {
		id: "s1".to_string(),
		request_id: "r1".to_string(),
		responder_id: responder.to_string(),
		message: "I can help".to_string(),
		status: ResponseStatus::Pending,
	}
}

#[test]
fn test_owner_edits_own_alert() {
	let owner = User::new("u1", Role::User);
	assert!(can_edit(Some(&owner), &alert("u1")));
	assert!(can_edit_alert(Some(&owner), "u1"));
}

#[test]
fn test_trusted_user_edits_foreign_alert() {
	let trusted = User::new("u2", Role::TrustedUser);
	assert!(can_edit(Some(&trusted), &alert("u1")));
	assert!(can_edit_alert(Some(&trusted), "u1"));
}

#[test]
fn test_trusted_user_cannot_edit_foreign_request() {
	let trusted = User::new("u2", Role::TrustedUser);
	assert!(!can_edit(Some(&trusted), &request("u1")));
	assert!(!can_edit_request(Some(&trusted), "u1"));
}

#[test]
fn test_moderator_deletes_foreign_response() {
	let moderator = User::new("m1", Role::Moderator);
	assert!(can_delete(Some(&moderator), &response("u1")));
	assert!(can_delete_response(Some(&moderator), "u1"));
}

#[test]
fn test_user_cannot_delete_foreign_response() {
	let user = User::new("u2", Role::User);
	assert!(!can_delete(Some(&user), &response("u1")));
	assert!(!can_delete_response(Some(&user), "u1"));
}

#[test]
fn test_accept_response_is_owner_only() {
	let owner = User::new("u1", Role::User);
	let req = request("u1");
	assert!(can_accept_response(Some(&owner), &req.user_id));
	assert!(is_allowed(Some(&owner), &req, Action::AcceptResponse));

	for role in Role::ALL {
		let other = User::new("u2", role);
		assert!(!can_accept_response(Some(&other), &req.user_id), "role: {role}");
		assert!(!is_allowed(Some(&other), &req, Action::AcceptResponse), "role: {role}");
	}
}

#[test]
fn test_accept_response_only_targets_requests() {
	let owner = User::new("u1", Role::Admin);
	assert!(!is_allowed(Some(&owner), &alert("u1"), Action::AcceptResponse));
	assert!(!is_allowed(Some(&owner), &response("u1"), Action::AcceptResponse));
}

#[test]
fn test_named_predicates_match_table() {
	let predicates: [(ResourceKind, Action, fn(Option<&User>, &str) -> bool); 7] = [
		(ResourceKind::Alert, Action::Edit, can_edit_alert),
		(ResourceKind::Alert, Action::Delete, can_delete_alert),
		(ResourceKind::Request, Action::Edit, can_edit_request),
		(ResourceKind::Request, Action::Delete, can_delete_request),
		(ResourceKind::Response, Action::Edit, can_edit_response),
		(ResourceKind::Response, Action::Delete, can_delete_response),
		(ResourceKind::Request, Action::AcceptResponse, can_accept_response),
	];

	for role in Role::ALL {
		let user = User::new("u2", role);
		for (kind, action, predicate) in predicates {
			assert_eq!(
				predicate(Some(&user), "u1"),
				role_allows(role, kind, action),
				"role: {role}, kind: {kind}, action: {action}"
			);
			assert!(predicate(Some(&user), "u2"), "owner, role: {role}, kind: {kind}, action: {action}");
			assert!(!predicate(None, "u2"), "no user, kind: {kind}, action: {action}");
		}
	}
}

#[test]
fn test_authorization_table() {
	// Non-owner edit rights per role, in alert, request, response order.
	let expected = [
		(Role::User, [false, false, false]),
		(Role::TrustedUser, [true, false, true]),
		(Role::Moderator, [true, false, true]),
		(Role::Representative, [true, false, true]),
		(Role::BusinessOwner, [true, false, true]),
		(Role::Admin, [true, false, true]),
	];

	for (role, edits) in expected {
		for (kind, edit) in ResourceKind::ALL.into_iter().zip(edits) {
			assert_eq!(role_allows(role, kind, Action::Edit), edit, "edit {kind} as {role}");
			assert_eq!(
				role_allows(role, kind, Action::Delete),
				matches!(role, Role::Moderator | Role::Admin),
				"delete {kind} as {role}"
			);
			assert!(!role_allows(role, kind, Action::AcceptResponse), "accept on {kind} as {role}");
		}
	}
}

#[test]
fn test_empty_ids_never_match() {
	let user = User::new("", Role::User);
	assert!(!can_edit_alert(Some(&user), ""));
	assert!(!can_delete_request(Some(&user), ""));
	assert!(!can_accept_response(Some(&user), ""));
}

#[test]
fn test_pedestrian_analytics() {
	assert!(!can_access_pedestrian_analytics(None));
	assert!(can_access_pedestrian_analytics(Some(&User::new("a", Role::Admin))));
	assert!(can_access_pedestrian_analytics(Some(&User::new("p", Role::User).with_premium(true))));
	assert!(!can_access_pedestrian_analytics(Some(&User::new("m", Role::Moderator))));
}

#[test]
fn test_check() {
	let user = User::new("u2", Role::TrustedUser);

	assert_eq!(check(None, &alert("u1"), Action::Edit), Err(PermissionError::NotLoggedIn));
	assert_eq!(check(Some(&user), &alert("u1"), Action::Edit), Ok(()));

	let err = check(Some(&user), &request("u1"), Action::Edit).unwrap_err();
	assert_eq!(
		err,
		PermissionError::Missing {
			kind: ResourceKind::Request,
			action: Action::Edit
		}
	);
	assert_eq!(err.to_string(), "missing permission: request:edit");
}

#[test]
fn test_permissions_evaluate() {
	let owner = User::new("u1", Role::User);
	let admin = User::new("a1", Role::Admin);

	assert_eq!(
		Permissions::evaluate(Some(&owner), &request("u1")),
		Permissions {
			edit: true,
			delete: true,
			accept_response: true
		}
	);
	assert_eq!(
		Permissions::evaluate(Some(&admin), &request("u1")),
		Permissions {
			edit: false,
			delete: true,
			accept_response: false
		}
	);
	assert_eq!(Permissions::evaluate(None, &alert("u1")), Permissions::default());

	let permissions = Permissions::evaluate(Some(&admin), &alert("u1"));
	for action in Action::ALL {
		assert_eq!(permissions.get(action), is_allowed(Some(&admin), &alert("u1"), action));
	}
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		self.0.lock().unwrap().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> std::io::Result<()> {
		Ok(())
	}
}

fn traced(f: impl FnOnce()) -> String {
	let captured = Captured::default();
	let writer = captured.clone();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(tracing::Level::TRACE)
		.with_ansi(false)
		.with_writer(move || writer.clone())
		.finish();

	tracing::subscriber::with_default(subscriber, f);

	let output = captured.0.lock().unwrap().clone();
	String::from_utf8(output).unwrap()
}

#[test]
fn test_denials_are_traced() {
	let logs = traced(|| {
		assert!(!can_access_pedestrian_analytics(Some(&User::new("m1", Role::Moderator))));
	});
	assert!(logs.contains("pedestrian analytics denied"), "{logs}");
	assert!(logs.contains("m1"), "{logs}");

	let logs = traced(|| {
		assert!(can_access_pedestrian_analytics(Some(&User::new("a1", Role::Admin))));
	});
	assert!(logs.is_empty(), "{logs}");

	let logs = traced(|| {
		assert_eq!(check(None, &alert("u1"), Action::Delete), Err(PermissionError::NotLoggedIn));
	});
	assert!(logs.contains("permission denied: no user"), "{logs}");
	assert!(logs.contains("delete"), "{logs}");
}

fn any_role() -> impl Strategy<Value = Role> {
	proptest::sample::select(Role::ALL.to_vec())
}

fn any_kind() -> impl Strategy<Value = ResourceKind> {
	proptest::sample::select(ResourceKind::ALL.to_vec())
}

proptest! {
	#[test]
	fn owner_can_always_edit_and_delete(id in "[a-z0-9]{1,24}", role in any_role(), kind in any_kind()) {
		let user = User::new(id.clone(), role);
		let resource = OwnerRef::new(kind, &id);

		prop_assert!(can_edit(Some(&user), &resource));
		prop_assert!(can_delete(Some(&user), &resource));
	}

	#[test]
	fn non_owner_edit_follows_role(user_id in "[a-z0-9]{1,24}", owner_id in "[a-z0-9]{1,24}", role in any_role(), kind in any_kind()) {
		prop_assume!(user_id != owner_id);
		let user = User::new(user_id, role);
		let resource = OwnerRef::new(kind, &owner_id);

		let expected = match kind {
			ResourceKind::Request => false,
			ResourceKind::Alert | ResourceKind::Response => role != Role::User,
		};
		prop_assert_eq!(can_edit(Some(&user), &resource), expected);
	}

	#[test]
	fn non_owner_delete_needs_moderator(user_id in "[a-z0-9]{1,24}", owner_id in "[a-z0-9]{1,24}", role in any_role(), kind in any_kind()) {
		prop_assume!(user_id != owner_id);
		let user = User::new(user_id, role);
		let resource = OwnerRef::new(kind, &owner_id);

		prop_assert_eq!(
			can_delete(Some(&user), &resource),
			matches!(role, Role::Moderator | Role::Admin)
		);
	}

	#[test]
	fn accept_response_iff_owner(user_id in "[a-z0-9]{1,24}", owner_id in "[a-z0-9]{1,24}", role in any_role(), premium in any::<bool>()) {
		let user = User::new(user_id.clone(), role).with_premium(premium);

		prop_assert_eq!(can_accept_response(Some(&user), &owner_id), user_id == owner_id);
	}

	#[test]
	fn absent_user_gets_nothing(owner_id in ".*", kind in any_kind()) {
		let resource = OwnerRef::new(kind, &owner_id);

		for action in Action::ALL {
			prop_assert!(!is_allowed(None, &resource, action));
		}
		prop_assert_eq!(Permissions::evaluate(None, &resource), Permissions::default());
	}
}
