use smarttask_core::{SubtaskRequest, SubtaskSchema};

/// Build the subtask-breakdown prompt for a validated request.
///
/// The output depends only on the request and the schema bounds, so equal
/// inputs always produce byte-identical prompts.
pub fn build_prompt(req: &SubtaskRequest, schema: &SubtaskSchema) -> String {
    let mut prompt = String::new();
    append_header(&mut prompt, schema);
    append_task(&mut prompt, req);
    append_instructions(&mut prompt);
    prompt
}

fn append_header(prompt: &mut String, schema: &SubtaskSchema) {
    prompt.push_str(&format!(
        "Break down the following task into {}-{} smaller, actionable subtasks:\n\n",
        schema.min_items, schema.max_items
    ));
}

fn append_task(prompt: &mut String, req: &SubtaskRequest) {
    prompt.push_str(&format!("Task Title: {}\n", req.title));
    if let Some(ref description) = req.description {
        prompt.push_str(&format!("Task Description: {description}\n"));
    }
    prompt.push('\n');
}

fn append_instructions(prompt: &mut String) {
    prompt.push_str(
        "Generate specific, actionable subtasks that would help someone complete \
         this main task. Each subtask should be clear and achievable.",
    );
}
