pub mod prompts;

pub const BANNER: &str = r#"
  ____  _ _            _             _ _ _
 / ___|(_) |_ ___     / \  _   _  __| (_) |_
 \___ \| | __/ _ \   / _ \| | | |/ _` | | __|
  ___) | | ||  __/  / ___ \ |_| | (_| | | |_
 |____/|_|\__\___| /_/   \_\__,_|\__,_|_|\__|

 AI report generator
"#;
