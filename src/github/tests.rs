//! Tests for the GitHub client, scoped client and repository paging.

use std::collections::HashMap;

use futures::TryStreamExt;
use mockall::Sequence;
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{
    ApiError, ApiErrorKind, GitHubApi, GitHubClient, IssueComment, MockGitHubApi,
    PersonalAccessToken, PullRequest, PullRequestState, REPOSITORY_PAGE_SIZE, Repository,
    RepositoryOwner, ScopedClient, list_repositories, repository_pages,
};
use crate::context::{ContextError, RunContext};

struct ClientFixture {
    runtime: Runtime,
    server: MockServer,
    client: GitHubClient,
}

impl ClientFixture {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn mount(&self, mock: Mock) {
        self.block_on(mock.mount(&self.server));
    }
}

#[fixture]
fn token() -> PersonalAccessToken {
    PersonalAccessToken::new("valid-token").expect("token should be valid")
}

#[fixture]
fn client_fixture(token: PersonalAccessToken) -> ClientFixture {
    let runtime = Runtime::new().expect("runtime should start");
    let server = runtime.block_on(MockServer::start());
    let client = {
        let _guard = runtime.enter();
        GitHubClient::new(&token, &server.uri()).expect("should create client")
    };
    ClientFixture {
        runtime,
        server,
        client,
    }
}

fn repository(id: u64, name: &str) -> Repository {
    Repository {
        id,
        name: name.to_owned(),
        full_name: Some(format!("octo/{name}")),
        ..Repository::default()
    }
}

fn repository_json(id: u64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("octo/{name}"),
        "private": false,
        "archived": false
    })
}

#[rstest]
#[case("")]
#[case("   ")]
fn token_rejects_blank_values(#[case] raw: &str) {
    let result = PersonalAccessToken::new(raw);
    assert!(
        matches!(result, Err(ApiError::Client { .. })),
        "expected Client error, got {result:?}"
    );
}

#[rstest]
fn token_debug_output_is_redacted() {
    let token = PersonalAccessToken::new("  ghp_secret  ").expect("token should be valid");
    assert_eq!(token.value(), "ghp_secret");
    assert!(!format!("{token:?}").contains("ghp_secret"));
}

#[rstest]
fn client_rejects_invalid_base_url(token: PersonalAccessToken) {
    let runtime = Runtime::new().expect("runtime should start");
    let _guard = runtime.enter();
    let result = GitHubClient::new(&token, "not a url");
    assert!(
        matches!(result, Err(ApiError::Client { .. })),
        "expected Client error, got {result:?}"
    );
}

#[rstest]
fn list_pull_requests_maps_fields_and_follows_pages(client_fixture: ClientFixture) {
    let pulls_path = "/repos/octo/repo/pulls";
    let next_url = format!(
        "{uri}{pulls_path}?state=open&per_page=100&page=2",
        uri = client_fixture.server.uri()
    );

    client_fixture.mount(
        Mock::given(method("GET"))
            .and(path(pulls_path))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "number": 2,
                "title": "Second",
                "state": "open",
                "draft": true,
                "user": { "login": "hubot" }
            }]))),
    );
    client_fixture.mount(
        Mock::given(method("GET"))
            .and(path(pulls_path))
            .and(query_param("state", "open"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{
                        "number": 1,
                        "title": "First",
                        "state": "open",
                        "html_url": "https://github.com/octo/repo/pull/1",
                        "user": { "login": "octocat" },
                        "head": { "ref": "feature" },
                        "base": { "ref": "main" }
                    }]))
                    .insert_header("Link", format!("<{next_url}>; rel=\"next\"")),
            ),
    );

    let pulls = client_fixture
        .block_on(
            client_fixture
                .client
                .list_pull_requests("octo", "repo", PullRequestState::Open),
        )
        .expect("request should succeed");

    let expected = vec![
        PullRequest {
            number: 1,
            title: Some("First".to_owned()),
            state: Some("open".to_owned()),
            draft: false,
            html_url: Some("https://github.com/octo/repo/pull/1".to_owned()),
            author: Some("octocat".to_owned()),
            head_ref: Some("feature".to_owned()),
            base_ref: Some("main".to_owned()),
        },
        PullRequest {
            number: 2,
            title: Some("Second".to_owned()),
            state: Some("open".to_owned()),
            draft: true,
            author: Some("hubot".to_owned()),
            ..PullRequest::default()
        },
    ];
    assert_eq!(pulls, expected);
}

#[rstest]
#[case(401, "Bad credentials", ApiErrorKind::Authentication)]
#[case(404, "Not Found", ApiErrorKind::NotFound)]
#[case(422, "Validation Failed", ApiErrorKind::Api)]
fn get_pull_request_classifies_failures(
    client_fixture: ClientFixture,
    #[case] status: u16,
    #[case] message: &str,
    #[case] expected: ApiErrorKind,
) {
    client_fixture.mount(
        Mock::given(method("GET"))
            .and(path("/repos/octo/repo/pulls/4"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "message": message,
                "documentation_url": "https://docs.github.com/rest"
            }))),
    );

    let error = client_fixture
        .block_on(client_fixture.client.get_pull_request("octo", "repo", 4))
        .expect_err("request should fail");

    assert_eq!(error.kind(), Some(expected));
    assert_eq!(error.status().map(|code| code.as_u16()), Some(status));
    assert_eq!(
        error.to_string(),
        format!("get pull request failed for octo/repo#4: {expected}")
    );
}

#[rstest]
fn rate_limit_responses_are_classified(client_fixture: ClientFixture) {
    client_fixture.mount(
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "API rate limit exceeded for user",
                "documentation_url": "https://docs.github.com/rest/rate-limit"
            }))),
    );

    let error = client_fixture
        .block_on(client_fixture.client.get_user("octocat"))
        .expect_err("request should fail");

    assert_eq!(error.kind(), Some(ApiErrorKind::RateLimited));
    assert!(
        error.to_string().starts_with("get user failed for user octocat"),
        "unexpected message: {error}"
    );
}

#[rstest]
fn unreachable_server_is_a_network_error(token: PersonalAccessToken) {
    let runtime = Runtime::new().expect("runtime should start");
    let client = {
        let _guard = runtime.enter();
        GitHubClient::new(&token, "http://127.0.0.1:9").expect("should create client")
    };

    let error = runtime
        .block_on(client.get_authenticated_user())
        .expect_err("request should fail");

    assert_eq!(error.kind(), Some(ApiErrorKind::Network));
}

#[rstest]
fn create_issue_comment_posts_body(client_fixture: ClientFixture) {
    client_fixture.mount(
        Mock::given(method("POST"))
            .and(path("/repos/octo/repo/issues/7/comments"))
            .and(wiremock::matchers::body_json(json!({ "body": "Looks good" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 99,
                "body": "Looks good",
                "user": { "login": "octocat" },
                "html_url": "https://github.com/octo/repo/issues/7#issuecomment-99"
            }))),
    );

    let comment = client_fixture
        .block_on(
            client_fixture
                .client
                .create_issue_comment("octo", "repo", 7, "Looks good"),
        )
        .expect("request should succeed");

    assert_eq!(comment.id, 99);
    assert_eq!(comment.author.as_deref(), Some("octocat"));
}

#[rstest]
fn delete_issue_comment_accepts_no_content(client_fixture: ClientFixture) {
    client_fixture.mount(
        Mock::given(method("DELETE"))
            .and(path("/repos/octo/repo/issues/comments/12"))
            .respond_with(ResponseTemplate::new(204)),
    );

    client_fixture
        .block_on(client_fixture.client.delete_issue_comment("octo", "repo", 12))
        .expect("request should succeed");
}

#[rstest]
fn get_organization_and_repository_map_fields(client_fixture: ClientFixture) {
    client_fixture.mount(
        Mock::given(method("GET"))
            .and(path("/orgs/octo-org"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5,
                "login": "octo-org",
                "name": "Octo Org",
                "description": null
            }))),
    );
    client_fixture.mount(
        Mock::given(method("GET"))
            .and(path("/repos/octo/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repository_json(3, "hello"))),
    );

    let org = client_fixture
        .block_on(client_fixture.client.get_organization("octo-org"))
        .expect("organization request should succeed");
    let repo = client_fixture
        .block_on(client_fixture.client.get_repository("octo", "hello"))
        .expect("repository request should succeed");

    assert_eq!(org.login, "octo-org");
    assert_eq!(org.name.as_deref(), Some("Octo Org"));
    assert_eq!(repo, repository(3, "hello"));
}

#[rstest]
#[case(RepositoryOwner::Organization("octo-org".to_owned()), "/orgs/octo-org/repos")]
#[case(RepositoryOwner::User("octocat".to_owned()), "/users/octocat/repos")]
fn list_repositories_stops_at_first_empty_page(
    client_fixture: ClientFixture,
    #[case] owner: RepositoryOwner,
    #[case] repos_path: &str,
) {
    let page = |number: &str, body: serde_json::Value| {
        Mock::given(method("GET"))
            .and(path(repos_path))
            .and(query_param("page", number))
            .and(query_param("per_page", REPOSITORY_PAGE_SIZE.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
    };
    client_fixture.mount(page(
        "1",
        json!([repository_json(1, "one"), repository_json(2, "two")]),
    ));
    client_fixture.mount(page("2", json!([repository_json(3, "three")])));
    client_fixture.mount(page("3", json!([])).expect(1));
    client_fixture.mount(page("4", json!([repository_json(4, "never")])).expect(0));

    let repos = client_fixture
        .block_on(client_fixture.client.list_repositories(&owner))
        .expect("listing should succeed");

    let names: Vec<&str> = repos.iter().map(|repo| repo.name.as_str()).collect();
    assert_eq!(names, ["one", "two", "three"]);
    client_fixture.block_on(client_fixture.server.verify());
}

#[rstest]
fn repository_pages_are_lazy_and_restartable() {
    let mut api = MockGitHubApi::new();
    let owner = RepositoryOwner::User("octocat".to_owned());
    let mut sequence = Sequence::new();
    for _ in 0..2 {
        api.expect_repository_page()
            .with(eq(owner.clone()), eq(1_u32), eq(REPOSITORY_PAGE_SIZE))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _, _| Ok(vec![repository(1, "one")]));
        api.expect_repository_page()
            .with(eq(owner.clone()), eq(2_u32), eq(REPOSITORY_PAGE_SIZE))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _, _| Ok(Vec::new()));
    }

    let runtime = Runtime::new().expect("runtime should start");
    let pages = repository_pages(&api, &owner);
    let first: Vec<Vec<Repository>> = runtime
        .block_on(pages.try_collect())
        .expect("first pass should succeed");
    let second = runtime
        .block_on(list_repositories(&api, &owner))
        .expect("second pass should succeed");

    assert_eq!(first, vec![vec![repository(1, "one")]]);
    assert_eq!(second, vec![repository(1, "one")]);
}

#[rstest]
fn repository_pages_stop_at_first_error() {
    let mut api = MockGitHubApi::new();
    let owner = RepositoryOwner::Organization("octo-org".to_owned());
    api.expect_repository_page()
        .with(eq(owner.clone()), eq(1_u32), eq(REPOSITORY_PAGE_SIZE))
        .times(1)
        .returning(|_, _, _| {
            Err(ApiError::Client {
                message: "boom".to_owned(),
            })
        });

    let runtime = Runtime::new().expect("runtime should start");
    let result = runtime.block_on(list_repositories(&api, &owner));

    assert!(
        matches!(result, Err(ApiError::Client { ref message }) if message == "boom"),
        "expected Client error, got {result:?}"
    );
}

#[rstest]
fn scoped_client_fills_in_owner_and_repository() {
    let mut api = MockGitHubApi::new();
    api.expect_get_pull_request()
        .with(eq("octo"), eq("repo"), eq(4_u64))
        .times(1)
        .returning(|_, _, number| {
            Ok(PullRequest {
                number,
                ..PullRequest::default()
            })
        });
    api.expect_create_issue_comment()
        .with(eq("octo"), eq("repo"), eq(4_u64), eq("thanks"))
        .times(1)
        .returning(|_, _, _, body| {
            Ok(IssueComment {
                id: 1,
                body: Some(body.to_owned()),
                ..IssueComment::default()
            })
        });
    api.expect_delete_issue_comment()
        .with(eq("octo"), eq("repo"), eq(1_u64))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let scoped = ScopedClient::new(&api, "octo", "repo");
    let runtime = Runtime::new().expect("runtime should start");
    let pull = runtime
        .block_on(scoped.get_pull_request(4))
        .expect("pull request should load");
    let comment = runtime
        .block_on(scoped.create_issue_comment(pull.number, "thanks"))
        .expect("comment should post");
    runtime
        .block_on(scoped.delete_issue_comment(comment.id))
        .expect("comment should delete");

    assert_eq!(scoped.owner(), "octo");
    assert_eq!(scoped.repo(), "repo");
    assert_eq!(comment.body.as_deref(), Some("thanks"));
}

#[rstest]
fn scoped_client_propagates_errors_unchanged() {
    let mut api = MockGitHubApi::new();
    api.expect_list_issue_comments()
        .times(1)
        .returning(|_, _, _| {
            Err(ApiError::Client {
                message: "offline".to_owned(),
            })
        });

    let scoped = ScopedClient::new(&api, "octo", "repo");
    let runtime = Runtime::new().expect("runtime should start");
    let result = runtime.block_on(scoped.list_issue_comments(3));

    assert!(
        matches!(result, Err(ApiError::Client { ref message }) if message == "offline"),
        "expected Client error, got {result:?}"
    );
}

#[rstest]
fn scoped_client_binds_to_workflow_repository() {
    let api = MockGitHubApi::new();
    let env = HashMap::from([("GITHUB_REPOSITORY".to_owned(), "octo/repo".to_owned())]);
    let context = RunContext::from_source(&env);

    let scoped = ScopedClient::from_context(&api, &context).expect("repository should split");

    assert_eq!((scoped.owner(), scoped.repo()), ("octo", "repo"));
}

#[rstest]
fn scoped_client_requires_workflow_repository() {
    let api = MockGitHubApi::new();
    let context = RunContext::from_source(&HashMap::<String, String>::new());
    let result = ScopedClient::from_context(&api, &context);
    assert!(
        matches!(result, Err(ContextError::MissingRepository)),
        "expected MissingRepository"
    );
}

#[rstest]
fn gateway_trait_is_object_safe() {
    let api = MockGitHubApi::new();
    let dynamic: &dyn GitHubApi = &api;
    let scoped = ScopedClient::new(dynamic, "octo", "repo");
    assert_eq!(scoped.repo(), "repo");
}
