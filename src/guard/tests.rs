use super::*;

const ANON: AuthStatus = AuthStatus::Unauthenticated;
const LOADING: AuthStatus = AuthStatus::Loading;
const MEMBER: AuthStatus = AuthStatus::Authenticated { admin: false };
const ADMIN: AuthStatus = AuthStatus::Authenticated { admin: true };

#[test]
fn test_path_parsing_roundtrip() {
    for route in [
        AppRoute::Root,
        AppRoute::Login,
        AppRoute::Register,
        AppRoute::Dashboard,
        AppRoute::Profile,
        AppRoute::Users,
        AppRoute::Roles,
    ] {
        assert_eq!(AppRoute::from_path(route.to_path()), route);
    }
    assert_eq!(AppRoute::from_path("/users/"), AppRoute::Users);
    assert_eq!(AppRoute::from_path("/settings"), AppRoute::NotFound);
}

#[test]
fn test_authenticated_route_redirects_anonymous_to_login() {
    assert_eq!(
        decide(ANON, AppRoute::Dashboard),
        GuardDecision::Redirect(AppRoute::Login)
    );
    assert_eq!(
        decide(ANON, AppRoute::Profile),
        GuardDecision::Redirect(AppRoute::Login)
    );
    assert_eq!(decide(MEMBER, AppRoute::Profile), GuardDecision::Render);
}

#[test]
fn test_protected_routes_wait_while_loading() {
    for route in [AppRoute::Dashboard, AppRoute::Users, AppRoute::Login, AppRoute::Root] {
        assert_eq!(decide(LOADING, route), GuardDecision::Wait);
    }
    assert_eq!(resolve(LOADING, AppRoute::Roles), Resolution::Wait(AppRoute::Roles));
}

#[test]
fn test_public_routes_bounce_authenticated_sessions() {
    for status in [MEMBER, ADMIN] {
        assert_eq!(
            decide(status, AppRoute::Login),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
        assert_eq!(
            decide(status, AppRoute::Register),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
    }
    assert_eq!(decide(ANON, AppRoute::Register), GuardDecision::Render);
}

#[test]
fn test_admin_routes() {
    assert_eq!(decide(ADMIN, AppRoute::Users), GuardDecision::Render);
    assert_eq!(decide(ADMIN, AppRoute::Roles), GuardDecision::Render);
    assert_eq!(
        decide(MEMBER, AppRoute::Roles),
        GuardDecision::Redirect(AppRoute::Dashboard)
    );
    assert_eq!(
        decide(ANON, AppRoute::Users),
        GuardDecision::Redirect(AppRoute::Login)
    );
}

#[test]
fn test_unknown_paths_go_through_root() {
    assert_eq!(
        decide(ANON, AppRoute::NotFound),
        GuardDecision::Redirect(AppRoute::Root)
    );
    assert_eq!(
        resolve(ANON, AppRoute::from_path("/nope")),
        Resolution::Render(AppRoute::Login)
    );
    assert_eq!(
        resolve(MEMBER, AppRoute::from_path("/nope")),
        Resolution::Render(AppRoute::Dashboard)
    );
}

#[test]
fn test_resolve_never_renders_protected_for_anonymous() {
    for route in [AppRoute::Dashboard, AppRoute::Profile, AppRoute::Users, AppRoute::Roles] {
        assert_eq!(resolve(ANON, route), Resolution::Render(AppRoute::Login));
    }
    assert_eq!(
        resolve(MEMBER, AppRoute::Users),
        Resolution::Render(AppRoute::Dashboard)
    );
}
