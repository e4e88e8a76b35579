use kit::{handler, App, AuthUser, HttpResponse, Request, Response};

use crate::actions::DeployAgentAction;

#[handler]
pub async fn deploy(user: AuthUser, req: Request) -> Response {
    let agent = App::resolve::<DeployAgentAction>()?
        .execute(user.id, req.param("id")?)
        .await?;
    Ok(HttpResponse::serialize(&agent)?)
}
