use keiko_entity::training_request::{Entity as TrainingRequest, Model, Status};
use sea_orm::{DatabaseConnection, EntityTrait, IntoActiveModel};
use uuid::Uuid;

#[allow(dead_code)]
pub async fn create_queued_request(
    db: &DatabaseConnection,
    id: &str,
    learner_id: Uuid,
    competency_level: &str,
) -> Model {
    let request = Model {
        id: id.to_owned(),
        learner_id,
        competency_level: competency_level.to_owned(),
        status: Status::InQueue,
        training_batch_id: None,
        drop_off_reason: None,
    };
    TrainingRequest::insert(request.clone().into_active_model())
        .exec(db)
        .await
        .unwrap();
    request
}
