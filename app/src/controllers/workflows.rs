use kit::{handler, App, AuthUser, FromRequest, HttpResponse, Request, Response};

use crate::actions::{
    AddAgentAction, CreateWorkflowAction, DeleteWorkflowAction, ListWorkflowsAction,
    ShowWorkflowAction, UpdateWorkflowAction,
};
use crate::requests::{AddAgentRequest, CreateWorkflowRequest, UpdateWorkflowRequest};

#[handler]
pub async fn index(user: AuthUser) -> Response {
    let workflows = App::resolve::<ListWorkflowsAction>()?.execute(user.id).await?;
    Ok(HttpResponse::serialize(&workflows)?)
}

#[handler]
pub async fn store(user: AuthUser, form: CreateWorkflowRequest) -> Response {
    let workflow = App::resolve::<CreateWorkflowAction>()?
        .execute(user.id, form)
        .await?;
    Ok(HttpResponse::serialize(&workflow)?.status(201))
}

#[handler]
pub async fn show(user: AuthUser, req: Request) -> Response {
    let workflow = App::resolve::<ShowWorkflowAction>()?
        .execute(user.id, req.param("id")?)
        .await?;
    Ok(HttpResponse::serialize(&workflow)?)
}

#[handler]
pub async fn update(user: AuthUser, req: Request) -> Response {
    let id = req.param("id")?.to_string();
    let form = UpdateWorkflowRequest::from_request(req).await?;

    let workflow = App::resolve::<UpdateWorkflowAction>()?
        .execute(user.id, &id, form)
        .await?;
    Ok(HttpResponse::serialize(&workflow)?)
}

#[handler]
pub async fn destroy(user: AuthUser, req: Request) -> Response {
    App::resolve::<DeleteWorkflowAction>()?
        .execute(user.id, req.param("id")?)
        .await?;
    Ok(HttpResponse::no_content())
}

#[handler]
pub async fn add_agent(user: AuthUser, req: Request) -> Response {
    let id = req.param("id")?.to_string();
    let form = AddAgentRequest::from_request(req).await?;

    let agent = App::resolve::<AddAgentAction>()?
        .execute(user.id, &id, form)
        .await?;
    Ok(HttpResponse::serialize(&agent)?)
}
